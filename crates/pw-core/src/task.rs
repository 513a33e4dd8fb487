// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Task` and the partial-update shape used by `UpsertTaskMeta`.

use crate::ids::{ProjectId, TaskId};
use crate::status::{SidecarMode, TaskStatus};
use serde::{Deserialize, Serialize};

/// A task row. `parent_task_id.is_empty()` means this task is a root task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub repo_root: String,
    pub project_id: ProjectId,
    pub parent_task_id: TaskId,
    pub title: String,
    pub current_command: String,
    pub status: TaskStatus,
    pub sidecar_mode: SidecarMode,
    pub description: String,
    pub flag: bool,
    pub flag_desc: String,
    pub flag_readed: bool,
    pub checked: bool,
    pub archived: bool,
    pub created_at: i64,
    pub last_modified: i64,
    pub last_auto_progress_at: i64,
}

crate::builder! {
    pub struct TaskBuilder => Task {
        into {
            task_id: TaskId = TaskId::new(),
            repo_root: String = "",
            title: String = "",
            current_command: String = "",
            description: String = "",
            flag_desc: String = "",
        }
        set {
            project_id: ProjectId = ProjectId::default(),
            parent_task_id: TaskId = TaskId::root(),
            status: TaskStatus = TaskStatus::Pending,
            sidecar_mode: SidecarMode = SidecarMode::Advisor,
            flag: bool = false,
            flag_readed: bool = false,
            checked: bool = false,
            archived: bool = false,
            created_at: i64 = 0,
            last_modified: i64 = 0,
            last_auto_progress_at: i64 = 0,
        }
    }
}

/// Per-field optional update for `UpsertTaskMeta`.
///
/// `project_id` is intentionally a plain `String`, not `Option<String>`: the
/// contract preserves the existing `project_id` when the supplied value is
/// empty and overwrites it otherwise, which is a different rule from every
/// other field here ("only set when `Some`").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskMetaUpsert {
    pub task_id: TaskId,
    pub project_id: String,
    pub title: Option<String>,
    pub current_command: Option<String>,
    pub status: Option<TaskStatus>,
    pub sidecar_mode: Option<SidecarMode>,
    pub description: Option<String>,
    pub flag: Option<bool>,
    pub flag_desc: Option<String>,
    pub flag_readed: Option<bool>,
    pub checked: Option<bool>,
    pub archived: Option<bool>,
    pub parent_task_id: Option<TaskId>,
}

impl TaskMetaUpsert {
    pub fn new(task_id: TaskId) -> Self {
        Self { task_id, ..Default::default() }
    }

    crate::setters! {
        option {
            title: String,
            current_command: String,
            description: String,
            flag_desc: String,
        }
    }

    pub fn status(mut self, v: TaskStatus) -> Self {
        self.status = Some(v);
        self
    }

    pub fn sidecar_mode(mut self, v: SidecarMode) -> Self {
        self.sidecar_mode = Some(v);
        self
    }

    pub fn flag(mut self, v: bool) -> Self {
        self.flag = Some(v);
        self
    }

    pub fn flag_readed(mut self, v: bool) -> Self {
        self.flag_readed = Some(v);
        self
    }

    pub fn checked(mut self, v: bool) -> Self {
        self.checked = Some(v);
        self
    }

    pub fn archived(mut self, v: bool) -> Self {
        self.archived = Some(v);
        self
    }

    pub fn parent_task_id(mut self, v: impl Into<TaskId>) -> Self {
        self.parent_task_id = Some(v.into());
        self
    }

    pub fn project_id(mut self, v: impl Into<String>) -> Self {
        self.project_id = v.into();
        self
    }
}
