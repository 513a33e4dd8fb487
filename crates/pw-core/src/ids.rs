// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete ID types used throughout the core.
//!
//! `TaskId`/`RunId` are generated by this system ([`crate::define_id!`]).
//! Everything else names something assigned by an external collaborator
//! (the multiplexer daemon, the pane watcher, a caller-supplied project
//! name) and is never minted here ([`crate::external_id!`]).

crate::define_id! {
    /// Globally unique task identifier.
    pub struct TaskId("tsk-");
}

crate::define_id! {
    /// Globally unique run identifier.
    pub struct RunId("run-");
}

crate::external_id! {
    /// Caller-supplied project identifier; scopes tasks and PM sessions.
    pub struct ProjectId;
}

crate::external_id! {
    /// Pane identifier assigned by the multiplexer daemon.
    pub struct PaneId;
}

crate::external_id! {
    /// Human-addressable pane target (e.g. `session:window.pane`).
    pub struct PaneTarget;
}

crate::external_id! {
    /// Identifies one running multiplexer daemon instance.
    pub struct ServerInstanceId;
}

crate::external_id! {
    /// Idempotency key for a completion-inbox request, unique per run.
    pub struct RequestId;
}

crate::external_id! {
    /// UUID string minted by `CreatePMSession`; stored as an opaque string
    /// since PM sessions are addressed the same way regardless of who
    /// generated the id.
    pub struct PmSessionId;
}

impl TaskId {
    /// The empty `TaskId` used to mean "no parent" (root task).
    pub fn root() -> Self {
        Self(crate::id::IdBuf::empty())
    }
}
