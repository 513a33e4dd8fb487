// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable human-facing threads: PM sessions/messages (millisecond clocks,
//! scoped by `project_id`) and task notes/messages (second-granularity,
//! scoped by `task_id`).

use crate::ids::{PmSessionId, ProjectId, TaskId};
use crate::status::MessageStatus;
use serde::{Deserialize, Serialize};

/// A PM chat session. Ordered by `last_message_at DESC, updated_at DESC,
/// created_at DESC, session_id DESC` in `ListPMSessionsByProject`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmSession {
    pub session_id: PmSessionId,
    pub repo_root: String,
    pub project_id: ProjectId,
    pub title: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
    pub last_message_at_ms: i64,
}

/// A single PM chat message. Ordered by `created_at ASC, id ASC` in
/// `ListPMMessages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmMessage {
    pub id: u64,
    pub session_id: PmSessionId,
    pub role: String,
    pub content: String,
    pub status: MessageStatus,
    pub err: Option<String>,
    pub created_at_ms: i64,
}

/// A free-form note attached to a task. Ordered `created_at ASC, id ASC`,
/// mirroring `PmMessage`'s ordering but at second granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNote {
    pub id: u64,
    pub task_id: TaskId,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A chat-style message attached directly to a task (no session concept —
/// task messages are scoped by `task_id` alone).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMessage {
    pub id: u64,
    pub task_id: TaskId,
    pub role: String,
    pub content: String,
    pub status: MessageStatus,
    pub err: Option<String>,
    pub created_at: i64,
}
