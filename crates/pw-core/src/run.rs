// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TaskRun` — a logical execution attached to a task.

use crate::ids::{RunId, TaskId};
use crate::status::RunStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRun {
    pub run_id: RunId,
    pub task_id: TaskId,
    pub run_status: RunStatus,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub updated_at: i64,
    pub last_error: Option<String>,
}

crate::builder! {
    pub struct TaskRunBuilder => TaskRun {
        into {
            run_id: RunId = RunId::new(),
        }
        set {
            task_id: TaskId = TaskId::root(),
            run_status: RunStatus = RunStatus::Running,
            started_at: i64 = 0,
            completed_at: Option<i64> = None,
            updated_at: i64 = 0,
            last_error: Option<String> = None,
        }
    }
}

/// Caller-supplied shape for `InsertRun`; zeroed timestamps are filled in
/// by the repository (`started_at = now()` if zero, `run_status = running`
/// if blank).
#[derive(Debug, Clone, Default)]
pub struct RunRecord {
    pub run_id: RunId,
    pub task_id: TaskId,
    pub run_status: Option<RunStatus>,
    pub started_at: i64,
}
