// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `PaneRuntime` / `TaskRuntime` — the most recently observed state of a
//! physical pane, and the ephemeral task-to-pane mirror built from it.

use crate::ids::{PaneId, PaneTarget, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaneRuntime {
    pub pane_id: PaneId,
    pub pane_target: PaneTarget,
    pub current_command: String,
    pub runtime_status: String,
    pub snapshot: String,
    pub snapshot_hash: String,
    pub cursor_x: i64,
    pub cursor_y: i64,
    pub has_cursor: bool,
    pub updated_at: i64,
}

crate::builder! {
    pub struct PaneRuntimeBuilder => PaneRuntime {
        into {
            current_command: String = "",
            runtime_status: String = "",
            snapshot: String = "",
            snapshot_hash: String = "",
        }
        set {
            pane_id: PaneId = PaneId::default(),
            pane_target: PaneTarget = PaneTarget::default(),
            cursor_x: i64 = 0,
            cursor_y: i64 = 0,
            has_cursor: bool = false,
            updated_at: i64 = 0,
        }
    }
}

/// Ephemeral mirror binding a task to its source pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRuntime {
    pub task_id: TaskId,
    pub pane_id: PaneId,
    pub snapshot_hash: String,
    pub updated_at: i64,
}

/// One task-runtime entry from a `BatchUpsertRuntime` call. Carries
/// `current_command` so the repository can mirror it onto the matching
/// `tasks` row in the same transaction, per `spec.md` §4.B.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRuntimeEntry {
    pub task_id: TaskId,
    pub pane_id: PaneId,
    pub snapshot_hash: String,
    pub current_command: Option<String>,
    pub updated_at: i64,
}

/// Input to `BatchUpsertRuntime`: every pane and task runtime row to upsert
/// in one transaction. Keys not listed here must not be touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeBatch {
    pub panes: Vec<PaneRuntime>,
    pub tasks: Vec<TaskRuntimeEntry>,
}
