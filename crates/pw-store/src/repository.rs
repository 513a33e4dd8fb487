// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ProjectStateRepository` — typed operations over [`crate::db::Db`],
//! scoped to one `repo_root` (`spec.md` §4.B).

use std::sync::Arc;

use pw_core::{
    ActiveProject, BindingStatus, Clock, MessageStatus, PaneId, PaneRuntime, PaneTarget,
    PmMessage, PmSession, PmSessionId, ProjectId, RequestId, RunBinding, RunId, RunRecord,
    RunStatus, RuntimeBatch, ServerInstanceId, SystemClock, Task, TaskId, TaskMetaUpsert, TaskRun,
};
use serde_json::Value;

use crate::db::Db;
use crate::error::StoreError;
use crate::ops::StoreOp;

pub struct ProjectStateRepository<C: Clock = SystemClock> {
    db: Arc<Db<C>>,
    repo_root: String,
}

fn require_non_empty(value: &str, field: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

impl<C: Clock> ProjectStateRepository<C> {
    pub fn new(db: Arc<Db<C>>, repo_root: impl Into<String>) -> Self {
        Self { db, repo_root: repo_root.into() }
    }

    pub fn repo_root(&self) -> &str {
        &self.repo_root
    }

    // ---- Tasks ----------------------------------------------------------

    /// Unconditional insert. `task.repo_root` is overwritten with the scope
    /// this repository was constructed with.
    pub fn insert_task(&self, mut task: Task) -> Result<Task, StoreError> {
        require_non_empty(task.task_id.as_str(), "task id")?;
        require_non_empty(task.project_id.as_str(), "project id")?;
        task.repo_root = self.repo_root.clone();

        self.db.transact(|_state, clock| {
            let now = clock.epoch_secs();
            task.created_at = now;
            task.last_modified = now;
            Ok((task.clone(), Some(StoreOp::InsertTask(task.clone()))))
        })
    }

    pub fn upsert_task_meta(&self, upsert: TaskMetaUpsert) -> Result<(), StoreError> {
        require_non_empty(upsert.task_id.as_str(), "task id")?;
        self.db.transact(|_state, clock| {
            let now = clock.epoch_secs();
            Ok(((), Some(StoreOp::UpsertTaskMeta { upsert, last_modified: now })))
        })
    }

    /// Non-archived rows for this scope, ordered `created_at ASC, task_id ASC`.
    pub fn list_tasks_by_project(&self, project_id: &ProjectId) -> Vec<Task> {
        self.db.view(|state| {
            let mut tasks: Vec<Task> = state
                .tasks
                .values()
                .filter(|t| {
                    t.repo_root == self.repo_root && &t.project_id == project_id && !t.archived
                })
                .cloned()
                .collect();
            tasks.sort_by(|a, b| (a.created_at, a.task_id.as_str()).cmp(&(b.created_at, b.task_id.as_str())));
            tasks
        })
    }

    pub fn archive_checked_tasks_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<u64, StoreError> {
        let repo_root = self.repo_root.clone();
        let project_id = project_id.clone();
        self.db.transact(|state, clock| {
            let now = clock.epoch_secs();
            let affected = state
                .tasks
                .values()
                .filter(|t| t.repo_root == repo_root && t.project_id == project_id && t.checked && !t.archived)
                .count() as u64;
            let op = (affected > 0).then_some(StoreOp::ArchiveCheckedTasksByProject {
                repo_root,
                project_id,
                now,
            });
            Ok((affected, op))
        })
    }

    pub fn delete_task(&self, task_id: &TaskId) -> Result<(), StoreError> {
        let repo_root = self.repo_root.clone();
        let task_id = *task_id;
        self.db.transact(|_state, _clock| {
            Ok(((), Some(StoreOp::DeleteTask { repo_root, task_id })))
        })
    }

    pub fn get_project_max_task_last_modified(&self, project_id: &ProjectId) -> i64 {
        self.db.view(|state| {
            state
                .tasks
                .values()
                .filter(|t| t.repo_root == self.repo_root && &t.project_id == project_id)
                .map(|t| t.last_modified)
                .max()
                .unwrap_or(0)
        })
    }

    /// Conditional upsert: inserts `template` if the task is missing,
    /// otherwise advances `last_auto_progress_at` only if `observed_at` is
    /// strictly greater than what's stored. Returns `true` iff the row
    /// changed. Implemented as a single `transact` closure so the
    /// read-then-write never races (`spec.md` §4.B).
    pub fn try_mark_task_auto_progress_observed(
        &self,
        template: &Task,
        observed_at: i64,
    ) -> Result<bool, StoreError> {
        let repo_root = self.repo_root.clone();
        let task_id = template.task_id;
        let mut insert_template = template.clone();
        insert_template.repo_root = repo_root.clone();
        insert_template.last_auto_progress_at = observed_at;

        self.db.transact(|state, clock| match state.tasks.get(&task_id) {
            None => {
                let now = clock.epoch_secs();
                if insert_template.created_at == 0 {
                    insert_template.created_at = now;
                }
                insert_template.last_modified = now;
                Ok((true, Some(StoreOp::InsertTask(insert_template.clone()))))
            }
            Some(existing) => {
                let advances = observed_at > existing.last_auto_progress_at;
                let op = advances.then_some(StoreOp::MarkAutoProgressObserved {
                    repo_root: repo_root.clone(),
                    task_id,
                    observed_at,
                });
                Ok((advances, op))
            }
        })
    }

    // ---- Runs -------------------------------------------------------------

    pub fn insert_run(&self, record: RunRecord) -> Result<TaskRun, StoreError> {
        self.db.transact(|_state, clock| {
            let now = clock.epoch_secs();
            let run = TaskRun {
                run_id: record.run_id,
                task_id: record.task_id,
                run_status: record.run_status.unwrap_or(RunStatus::Running),
                started_at: if record.started_at == 0 { now } else { record.started_at },
                completed_at: None,
                updated_at: now,
                last_error: None,
            };
            Ok((run.clone(), Some(StoreOp::InsertRun(run))))
        })
    }

    pub fn get_run(&self, run_id: &RunId) -> Option<TaskRun> {
        self.db.view(|state| state.task_runs.get(run_id).cloned())
    }

    pub fn upsert_run_binding(&self, binding: RunBinding) -> Result<(), StoreError> {
        self.db.transact(|_state, _clock| Ok(((), Some(StoreOp::UpsertRunBinding(binding)))))
    }

    /// Atomic transaction: transitions every live binding under
    /// `server_instance_id` to stale, and every affected run to
    /// `needs_rebind`, in one committed op.
    pub fn mark_bindings_stale_by_server(
        &self,
        server_instance_id: &ServerInstanceId,
        reason: &str,
    ) -> Result<(), StoreError> {
        let server_instance_id = server_instance_id.clone();
        let reason = reason.to_string();
        self.db.transact(|state, clock| {
            let now = clock.epoch_secs();
            let affected = state
                .run_bindings
                .values()
                .any(|b| b.server_instance_id == server_instance_id && b.binding_status == BindingStatus::Live);
            let op = affected.then_some(StoreOp::MarkBindingsStaleByServer {
                server_instance_id,
                reason,
                now,
            });
            Ok(((), op))
        })
    }

    pub fn mark_run_completed(&self, run_id: &RunId) -> Result<(), StoreError> {
        let run_id = *run_id;
        self.db.transact(|_state, clock| {
            Ok(((), Some(StoreOp::MarkRunCompleted { run_id, now: clock.epoch_secs() })))
        })
    }

    pub fn set_run_status(&self, run_id: &RunId, status: RunStatus) -> Result<(), StoreError> {
        let run_id = *run_id;
        self.db.transact(|_state, clock| {
            Ok(((), Some(StoreOp::SetRunStatus { run_id, status, now: clock.epoch_secs() })))
        })
    }

    pub fn get_live_binding_by_run_id(&self, run_id: &RunId) -> Option<RunBinding> {
        self.db.view(|state| {
            state
                .run_bindings
                .get(run_id)
                .filter(|b| b.binding_status == BindingStatus::Live)
                .cloned()
        })
    }

    pub fn get_binding_by_run_id(&self, run_id: &RunId) -> Option<RunBinding> {
        self.db.view(|state| state.run_bindings.get(run_id).cloned())
    }

    /// At most one live+running run matching `pane_target` by target or
    /// pane id, most-recently-updated wins.
    pub fn find_live_running_run_by_pane_target(&self, pane_target: &PaneTarget) -> Option<TaskRun> {
        self.db.view(|state| {
            state
                .run_bindings
                .values()
                .filter(|b| {
                    b.binding_status == BindingStatus::Live
                        && (&b.pane_target == pane_target || b.pane_id.as_str() == pane_target.as_str())
                })
                .filter_map(|b| state.task_runs.get(&b.run_id))
                .filter(|r| r.run_status == RunStatus::Running)
                .max_by_key(|r| r.updated_at)
                .cloned()
        })
    }

    pub fn list_run_candidates_by_pane_target(
        &self,
        pane_target: &PaneTarget,
        limit: usize,
    ) -> Vec<RunBinding> {
        self.db.view(|state| {
            let mut candidates: Vec<RunBinding> = state
                .run_bindings
                .values()
                .filter(|b| &b.pane_target == pane_target || b.pane_id.as_str() == pane_target.as_str())
                .cloned()
                .collect();
            candidates.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            candidates.truncate(limit);
            candidates
        })
    }

    pub fn append_run_event(
        &self,
        run_id: &RunId,
        event_type: impl Into<String>,
        payload: Value,
    ) -> Result<u64, StoreError> {
        let run_id = *run_id;
        let event_type = event_type.into();
        self.db.transact(|state, clock| {
            let now = clock.epoch_secs();
            let id = state.peek_next_id();
            Ok((id, Some(StoreOp::AppendRunEvent { run_id, event_type, payload_json: payload, now })))
        })
    }

    pub fn enqueue_run_action(
        &self,
        run_id: &RunId,
        action_type: impl Into<String>,
        payload: Value,
    ) -> Result<u64, StoreError> {
        let run_id = *run_id;
        let action_type = action_type.into();
        self.db.transact(|state, clock| {
            let now = clock.epoch_secs();
            let id = state.peek_next_id();
            Ok((id, Some(StoreOp::EnqueueRunAction { run_id, action_type, payload_json: payload, now })))
        })
    }

    pub fn count_outbox_by_run_id(&self, run_id: &RunId) -> u64 {
        self.db.view(|state| state.action_outbox.iter().filter(|a| &a.run_id == run_id).count() as u64)
    }

    pub fn count_run_events_by_type(&self, run_id: &RunId, event_type: &str) -> u64 {
        self.db.view(|state| {
            state
                .run_events
                .iter()
                .filter(|e| &e.run_id == run_id && e.event_type == event_type)
                .count() as u64
        })
    }

    pub fn insert_completion_inbox(
        &self,
        run_id: &RunId,
        request_id: &RequestId,
        summary: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), StoreError> {
        let run_id = *run_id;
        let request_id = request_id.clone();
        let summary = summary.into();
        let source = source.into();
        self.db.transact(|state, clock| {
            if state.completion_inbox.contains_key(&(run_id, request_id.clone())) {
                return Err(StoreError::DuplicateInboxRequest {
                    run_id: run_id.to_string(),
                    request_id: request_id.to_string(),
                });
            }
            let now = clock.epoch_secs();
            Ok(((), Some(StoreOp::InsertCompletionInbox { run_id, request_id, summary, source, now })))
        })
    }

    // ---- Runtime ------------------------------------------------------

    pub fn batch_upsert_runtime(&self, batch: RuntimeBatch) -> Result<(), StoreError> {
        let repo_root = self.repo_root.clone();
        self.db.transact(|_state, clock| {
            Ok(((), Some(StoreOp::BatchUpsertRuntime { repo_root, batch, now: clock.epoch_secs() })))
        })
    }

    pub fn get_pane_runtime_by_pane_id(&self, pane_id: &PaneId) -> Option<PaneRuntime> {
        self.db.view(|state| state.pane_runtime.get(pane_id).cloned())
    }

    // ---- Legacy panes/snapshots -----------------------------------------

    pub fn save_panes(&self, value: Value) -> Result<(), StoreError> {
        self.save_legacy_state(pw_core::PANES_KEY, value)
    }

    pub fn load_panes(&self) -> Value {
        self.load_legacy_state(pw_core::PANES_KEY)
    }

    /// Must not mutate `tasks.last_modified` — `StoreOp::SaveLegacyState`
    /// only ever touches `legacy_state`.
    pub fn save_pane_snapshots(&self, value: Value) -> Result<(), StoreError> {
        self.save_legacy_state(pw_core::SNAPSHOTS_KEY, value)
    }

    pub fn load_pane_snapshots(&self) -> Value {
        self.load_legacy_state(pw_core::SNAPSHOTS_KEY)
    }

    fn save_legacy_state(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let repo_root = self.repo_root.clone();
        let state_key = key.to_string();
        self.db.transact(|_state, clock| {
            Ok((
                (),
                Some(StoreOp::SaveLegacyState {
                    repo_root,
                    state_key,
                    value_json: value,
                    now: clock.epoch_secs(),
                }),
            ))
        })
    }

    fn load_legacy_state(&self, key: &str) -> Value {
        self.db.view(|state| {
            state
                .legacy_state
                .get(&(self.repo_root.clone(), key.to_string()))
                .map(|s| s.value_json.clone())
                .unwrap_or(Value::Null)
        })
    }

    // ---- PM sessions/messages ------------------------------------------

    pub fn create_pm_session(
        &self,
        project_id: &ProjectId,
        title: impl Into<String>,
    ) -> Result<PmSessionId, StoreError> {
        let repo_root = self.repo_root.clone();
        let project_id = project_id.clone();
        let title = title.into();
        let session_id = PmSessionId::from(uuid::Uuid::new_v4().to_string());
        self.db.transact(|_state, clock| {
            let now_ms = clock.epoch_ms() as i64;
            Ok((
                session_id.clone(),
                Some(StoreOp::CreatePmSession {
                    session_id: session_id.clone(),
                    repo_root,
                    project_id,
                    title,
                    now_ms,
                }),
            ))
        })
    }

    /// Ordered `last_message_at DESC, updated_at DESC, created_at DESC,
    /// session_id DESC`.
    pub fn list_pm_sessions_by_project(&self, project_id: &ProjectId, limit: usize) -> Vec<PmSession> {
        self.db.view(|state| {
            let mut sessions: Vec<PmSession> = state
                .pm_sessions
                .values()
                .filter(|s| s.repo_root == self.repo_root && &s.project_id == project_id)
                .cloned()
                .collect();
            sessions.sort_by(|a, b| {
                (b.last_message_at_ms, b.updated_at_ms, b.created_at_ms, b.session_id.as_str()).cmp(&(
                    a.last_message_at_ms,
                    a.updated_at_ms,
                    a.created_at_ms,
                    a.session_id.as_str(),
                ))
            });
            sessions.truncate(limit);
            sessions
        })
    }

    /// Empty `session_id` or `role` is a silent no-op returning id 0
    /// (documented open-question resolution, `spec.md` end note).
    pub fn insert_pm_message(
        &self,
        session_id: &PmSessionId,
        role: impl Into<String>,
        content: impl Into<String>,
        status: Option<MessageStatus>,
        err: Option<String>,
    ) -> Result<u64, StoreError> {
        let role = role.into();
        if session_id.is_empty() || role.is_empty() {
            return Ok(0);
        }
        let session_id = session_id.clone();
        let content = content.into();
        let status = status.unwrap_or(MessageStatus::Completed);
        self.db.transact(|state, clock| {
            let now_ms = clock.epoch_ms() as i64;
            let id = state.peek_next_id();
            Ok((
                id,
                Some(StoreOp::InsertPmMessage { session_id, role, content, status, err, now_ms }),
            ))
        })
    }

    pub fn update_pm_message(
        &self,
        message_id: u64,
        content: Option<String>,
        status: Option<MessageStatus>,
        err: Option<String>,
    ) -> Result<(), StoreError> {
        self.db.transact(|_state, clock| {
            Ok((
                (),
                Some(StoreOp::UpdatePmMessage {
                    message_id,
                    content,
                    status,
                    err,
                    now_ms: clock.epoch_ms() as i64,
                }),
            ))
        })
    }

    /// Ordered `created_at ASC, id ASC`.
    pub fn list_pm_messages(&self, session_id: &PmSessionId, limit: usize) -> Vec<PmMessage> {
        self.db.view(|state| {
            let mut messages: Vec<PmMessage> = state
                .pm_messages
                .values()
                .filter(|m| &m.session_id == session_id)
                .cloned()
                .collect();
            messages.sort_by(|a, b| (a.created_at_ms, a.id).cmp(&(b.created_at_ms, b.id)));
            messages.truncate(limit);
            messages
        })
    }

    pub fn get_pm_session(&self, session_id: &PmSessionId) -> Option<PmSession> {
        self.db.view(|state| state.pm_sessions.get(session_id).cloned())
    }

    // ---- Task notes / messages ------------------------------------------

    pub fn insert_task_note(&self, task_id: &TaskId, content: impl Into<String>) -> Result<u64, StoreError> {
        let task_id = *task_id;
        let content = content.into();
        self.db.transact(|state, clock| {
            let now = clock.epoch_secs();
            let id = state.peek_next_id();
            Ok((id, Some(StoreOp::InsertTaskNote { task_id, content, now })))
        })
    }

    pub fn update_task_note(&self, note_id: u64, content: impl Into<String>) -> Result<(), StoreError> {
        let content = content.into();
        self.db.transact(|_state, clock| {
            Ok(((), Some(StoreOp::UpdateTaskNote { note_id, content, now: clock.epoch_secs() })))
        })
    }

    /// Ordered `created_at ASC, id ASC`.
    pub fn list_task_notes(&self, task_id: &TaskId) -> Vec<pw_core::TaskNote> {
        self.db.view(|state| {
            let mut notes: Vec<_> =
                state.task_notes.values().filter(|n| &n.task_id == task_id).cloned().collect();
            notes.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
            notes
        })
    }

    pub fn insert_task_message(
        &self,
        task_id: &TaskId,
        role: impl Into<String>,
        content: impl Into<String>,
        status: Option<MessageStatus>,
        err: Option<String>,
    ) -> Result<u64, StoreError> {
        let task_id = *task_id;
        let role = role.into();
        let content = content.into();
        let status = status.unwrap_or(MessageStatus::Completed);
        self.db.transact(|state, clock| {
            let now = clock.epoch_secs();
            let id = state.peek_next_id();
            Ok((id, Some(StoreOp::InsertTaskMessage { task_id, role, content, status, err, now })))
        })
    }

    /// Ordered `created_at ASC, id ASC`.
    pub fn list_task_messages(&self, task_id: &TaskId) -> Vec<pw_core::TaskMessage> {
        self.db.view(|state| {
            let mut messages: Vec<_> =
                state.task_messages.values().filter(|m| &m.task_id == task_id).cloned().collect();
            messages.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
            messages
        })
    }
}

/// `ActiveProject` management is a thin wrapper over `pw-config`'s
/// `ProjectsStore` in the real daemon; exposed here too since the embedded
/// store mirrors the active-project set for `GetProjectMaxTaskLastModified`
/// style cross-checks in tests.
pub fn active_project_default_display_name(project: &ActiveProject) -> String {
    if project.display_name.trim().is_empty() {
        project.project_id.to_string()
    } else {
        project.display_name.clone()
    }
}
