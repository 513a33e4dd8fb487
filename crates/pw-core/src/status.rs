// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Closed enumerations for the sum-typed status fields named in the data
//! model. Stored on disk as their string form (`serde(rename_all =
//! "snake_case")`), matching "string storage on disk is acceptable" for
//! sum-typed status fields.

use serde::{Deserialize, Serialize};

/// `Task.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    WaitingUser,
    WaitingChildren,
    Completed,
    Failed,
    Canceled,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

crate::simple_display! {
    TaskStatus {
        Pending => "pending",
        Running => "running",
        WaitingUser => "waiting_user",
        WaitingChildren => "waiting_children",
        Completed => "completed",
        Failed => "failed",
        Canceled => "canceled",
    }
}

/// `Task.sidecar_mode` — the autonomy level of the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidecarMode {
    Advisor,
    Observer,
    Autopilot,
}

impl Default for SidecarMode {
    fn default() -> Self {
        Self::Advisor
    }
}

crate::simple_display! {
    SidecarMode {
        Advisor => "advisor",
        Observer => "observer",
        Autopilot => "autopilot",
    }
}

/// `TaskRun.run_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    NeedsRebind,
    Completed,
}

impl Default for RunStatus {
    fn default() -> Self {
        Self::Running
    }
}

crate::simple_display! {
    RunStatus {
        Running => "running",
        NeedsRebind => "needs_rebind",
        Completed => "completed",
    }
}

/// `RunBinding.binding_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingStatus {
    Live,
    Stale,
}

impl Default for BindingStatus {
    fn default() -> Self {
        Self::Live
    }
}

crate::simple_display! {
    BindingStatus {
        Live => "live",
        Stale => "stale",
    }
}

/// `ActionOutbox.status`. The spec leaves this open (`pending, …`); modeled
/// as a closed core set plus a catch-all so the outbox dispatcher (external,
/// out of scope) can round-trip statuses this system doesn't otherwise know
/// about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutboxStatus {
    Pending,
    Dispatched,
    Failed,
    Other(String),
}

impl Default for OutboxStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl OutboxStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Dispatched => "dispatched",
            Self::Failed => "failed",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for OutboxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for OutboxStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "dispatched" => Self::Dispatched,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for OutboxStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl Serialize for OutboxStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OutboxStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self::from(String::deserialize(deserializer)?))
    }
}

/// `PmMessage.status` / `TaskMessage.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Pending,
    Completed,
    Failed,
}

impl Default for MessageStatus {
    fn default() -> Self {
        Self::Completed
    }
}

crate::simple_display! {
    MessageStatus {
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
    }
}

/// `GlobalConfig.defaults.session_program`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionProgram {
    Shell,
    Codex,
    Claude,
    Cursor,
}

impl Default for SessionProgram {
    fn default() -> Self {
        Self::Shell
    }
}

crate::simple_display! {
    SessionProgram {
        Shell => "shell",
        Codex => "codex",
        Claude => "claude",
        Cursor => "cursor",
    }
}

impl SessionProgram {
    /// Parses a legacy `default_launch_program` value; unrecognized values
    /// return `None` so the caller can fall back to `shell`.
    pub fn parse_legacy(s: &str) -> Option<Self> {
        match s {
            "shell" => Some(Self::Shell),
            "codex" => Some(Self::Codex),
            "claude" => Some(Self::Claude),
            "cursor" => Some(Self::Cursor),
            _ => None,
        }
    }
}

/// `GlobalConfig.defaults.helper_program`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelperProgram {
    Codex,
    Claude,
    Cursor,
}

impl Default for HelperProgram {
    fn default() -> Self {
        Self::Codex
    }
}

crate::simple_display! {
    HelperProgram {
        Codex => "codex",
        Claude => "claude",
        Cursor => "cursor",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbox_status_roundtrips_unknown_values() {
        let s = OutboxStatus::from("dispatching");
        assert_eq!(s.as_str(), "dispatching");
        assert!(matches!(s, OutboxStatus::Other(_)));
    }

    #[test]
    fn task_status_displays_snake_case() {
        assert_eq!(TaskStatus::WaitingUser.to_string(), "waiting_user");
    }
}
