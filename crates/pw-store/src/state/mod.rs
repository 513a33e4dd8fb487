// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state built from WAL replay. Scoped-down sibling of the
//! teacher's `storage::state::MaterializedState`: where the teacher
//! dispatches `apply_event` across `agents`/`jobs`/`sessions`/`workers`
//! submodules, this system has one aggregate family (task/run/binding) so
//! `apply` stays in a single module.

use crate::ops::StoreOp;
use pw_core::{
    ActiveProject, BindingStatus, CompletionInbox, GlobalConfig, LegacyState, MessageStatus,
    PaneRuntime, PmMessage, PmSession, PmSessionId, ProjectId, RequestId, RunBinding, RunEvent,
    RunId, RunStatus, ServerInstanceId, Task, TaskId, TaskMessage, TaskNote, TaskRun, TaskRuntime,
    TaskStatus,
};
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct MaterializedState {
    pub tasks: HashMap<TaskId, Task>,
    pub task_runs: HashMap<RunId, TaskRun>,
    pub run_bindings: HashMap<RunId, RunBinding>,
    pub run_events: Vec<RunEvent>,
    pub completion_inbox: HashMap<(RunId, RequestId), CompletionInbox>,
    pub action_outbox: Vec<pw_core::ActionOutbox>,
    /// Required by `spec.md` §4.A's table list; last time each server
    /// instance was observed via a binding upsert. No dedicated operations
    /// are specified over it beyond this passive bookkeeping.
    pub tmux_servers: HashMap<ServerInstanceId, i64>,
    pub pane_runtime: HashMap<pw_core::PaneId, PaneRuntime>,
    pub task_runtime: HashMap<TaskId, TaskRuntime>,
    pub legacy_state: HashMap<(String, String), LegacyState>,
    pub task_notes: HashMap<u64, TaskNote>,
    pub task_messages: HashMap<u64, TaskMessage>,
    pub pm_sessions: HashMap<PmSessionId, PmSession>,
    pub pm_messages: HashMap<u64, PmMessage>,
    pub active_projects: HashMap<ProjectId, ActiveProject>,
    pub config_mirror: Option<GlobalConfig>,
    next_id: u64,
}

impl MaterializedState {
    pub fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// The id [`Self::next_id`] would hand out next, without consuming it.
    /// Lets a `Db::transact` closure predict the id a pending op will be
    /// assigned when applied, while only holding `&MaterializedState`.
    pub fn peek_next_id(&self) -> u64 {
        self.next_id + 1
    }

    pub fn apply(&mut self, op: &StoreOp) {
        match op {
            StoreOp::InsertTask(task) => {
                self.tasks.insert(task.task_id, task.clone());
            }
            StoreOp::UpsertTaskMeta { upsert, last_modified } => self.apply_upsert_task_meta(upsert, *last_modified),
            StoreOp::ArchiveCheckedTasksByProject { repo_root, project_id, now } => {
                for task in self.tasks.values_mut() {
                    if &task.repo_root == repo_root
                        && &task.project_id == project_id
                        && task.checked
                        && !task.archived
                    {
                        task.archived = true;
                        task.last_modified = *now;
                    }
                }
            }
            StoreOp::DeleteTask { repo_root, task_id } => {
                if self.tasks.get(task_id).map(|t| &t.repo_root) == Some(repo_root) {
                    self.tasks.remove(task_id);
                }
            }
            StoreOp::MarkAutoProgressObserved { task_id, observed_at, .. } => {
                if let Some(task) = self.tasks.get_mut(task_id) {
                    if *observed_at > task.last_auto_progress_at {
                        task.last_auto_progress_at = *observed_at;
                    }
                }
            }

            StoreOp::InsertRun(run) => {
                self.task_runs.insert(run.run_id, run.clone());
            }
            StoreOp::UpsertRunBinding(binding) => {
                self.tmux_servers.insert(binding.server_instance_id.clone(), binding.updated_at);
                self.run_bindings.insert(binding.run_id, binding.clone());
            }
            StoreOp::MarkBindingsStaleByServer { server_instance_id, reason, now } => {
                let mut affected_runs = Vec::new();
                for binding in self.run_bindings.values_mut() {
                    if &binding.server_instance_id == server_instance_id
                        && binding.binding_status == BindingStatus::Live
                    {
                        binding.binding_status = BindingStatus::Stale;
                        binding.stale_reason = Some(reason.clone());
                        binding.updated_at = *now;
                        affected_runs.push(binding.run_id);
                    }
                }
                for run_id in affected_runs {
                    if let Some(run) = self.task_runs.get_mut(&run_id) {
                        if run.run_status == RunStatus::Running {
                            run.run_status = RunStatus::NeedsRebind;
                            run.updated_at = *now;
                        }
                    }
                }
            }
            StoreOp::MarkRunCompleted { run_id, now } => {
                if let Some(run) = self.task_runs.get_mut(run_id) {
                    run.run_status = RunStatus::Completed;
                    run.completed_at = Some(*now);
                    run.updated_at = *now;
                }
            }
            StoreOp::SetRunStatus { run_id, status, now } => {
                if let Some(run) = self.task_runs.get_mut(run_id) {
                    run.run_status = *status;
                    run.updated_at = *now;
                }
            }
            StoreOp::AppendRunEvent { run_id, event_type, payload_json, now } => {
                let id = self.next_id();
                self.run_events.push(RunEvent {
                    id,
                    run_id: *run_id,
                    event_type: event_type.clone(),
                    payload_json: payload_json.clone(),
                    created_at: *now,
                });
            }
            StoreOp::EnqueueRunAction { run_id, action_type, payload_json, now } => {
                let id = self.next_id();
                self.action_outbox.push(pw_core::ActionOutbox {
                    id,
                    run_id: *run_id,
                    action_type: action_type.clone(),
                    payload_json: payload_json.clone(),
                    status: pw_core::OutboxStatus::Pending,
                    retry_count: 0,
                    next_retry_at: 0,
                    created_at: *now,
                    updated_at: *now,
                });
            }
            StoreOp::InsertCompletionInbox { run_id, request_id, summary, source, now } => {
                self.completion_inbox.insert(
                    (*run_id, request_id.clone()),
                    CompletionInbox {
                        run_id: *run_id,
                        request_id: request_id.clone(),
                        summary: summary.clone(),
                        source: source.clone(),
                        created_at: *now,
                    },
                );
            }

            StoreOp::BatchUpsertRuntime { repo_root, batch, now } => {
                for pane in &batch.panes {
                    let mut pane = pane.clone();
                    if pane.updated_at == 0 {
                        pane.updated_at = *now;
                    }
                    self.pane_runtime.insert(pane.pane_id.clone(), pane);
                }
                for entry in &batch.tasks {
                    let updated_at = if entry.updated_at == 0 { *now } else { entry.updated_at };
                    self.task_runtime.insert(
                        entry.task_id,
                        TaskRuntime {
                            task_id: entry.task_id,
                            pane_id: entry.pane_id.clone(),
                            snapshot_hash: entry.snapshot_hash.clone(),
                            updated_at,
                        },
                    );
                    if let Some(cmd) = &entry.current_command {
                        if let Some(task) = self.tasks.get_mut(&entry.task_id) {
                            if &task.repo_root == repo_root {
                                task.current_command = cmd.clone();
                            }
                        }
                    }
                }
            }
            StoreOp::SaveLegacyState { repo_root, state_key, value_json, now } => {
                self.legacy_state.insert(
                    (repo_root.clone(), state_key.clone()),
                    LegacyState {
                        repo_root: repo_root.clone(),
                        state_key: state_key.clone(),
                        value_json: value_json.clone(),
                        updated_at: *now,
                    },
                );
            }

            StoreOp::CreatePmSession { session_id, repo_root, project_id, title, now_ms } => {
                self.pm_sessions.insert(
                    session_id.clone(),
                    PmSession {
                        session_id: session_id.clone(),
                        repo_root: repo_root.clone(),
                        project_id: project_id.clone(),
                        title: title.clone(),
                        created_at_ms: *now_ms,
                        updated_at_ms: *now_ms,
                        last_message_at_ms: *now_ms,
                    },
                );
            }
            StoreOp::InsertPmMessage { session_id, role, content, status, err, now_ms } => {
                let id = self.next_id();
                self.pm_messages.insert(
                    id,
                    PmMessage {
                        id,
                        session_id: session_id.clone(),
                        role: role.clone(),
                        content: content.clone(),
                        status: *status,
                        err: err.clone(),
                        created_at_ms: *now_ms,
                    },
                );
                if let Some(session) = self.pm_sessions.get_mut(session_id) {
                    session.last_message_at_ms = *now_ms;
                    session.updated_at_ms = *now_ms;
                }
            }
            StoreOp::UpdatePmMessage { message_id, content, status, err, now_ms: _ } => {
                if let Some(msg) = self.pm_messages.get_mut(message_id) {
                    if let Some(content) = content {
                        msg.content = content.clone();
                    }
                    if let Some(status) = status {
                        msg.status = *status;
                    }
                    if let Some(err) = err {
                        msg.err = Some(err.clone());
                    }
                }
            }

            StoreOp::InsertTaskNote { task_id, content, now } => {
                let id = self.next_id();
                self.task_notes.insert(
                    id,
                    TaskNote {
                        id,
                        task_id: *task_id,
                        content: content.clone(),
                        created_at: *now,
                        updated_at: *now,
                    },
                );
            }
            StoreOp::UpdateTaskNote { note_id, content, now } => {
                if let Some(note) = self.task_notes.get_mut(note_id) {
                    note.content = content.clone();
                    note.updated_at = *now;
                }
            }
            StoreOp::InsertTaskMessage { task_id, role, content, status, err, now } => {
                let id = self.next_id();
                self.task_messages.insert(
                    id,
                    TaskMessage {
                        id,
                        task_id: *task_id,
                        role: role.clone(),
                        content: content.clone(),
                        status: *status,
                        err: err.clone(),
                        created_at: *now,
                    },
                );
            }

            StoreOp::MirrorConfig(cfg) => {
                self.config_mirror = Some(cfg.clone());
            }
        }
    }

    fn apply_upsert_task_meta(&mut self, upsert: &pw_core::TaskMetaUpsert, last_modified: i64) {
        let task = self.tasks.entry(upsert.task_id).or_insert_with(|| Task {
            task_id: upsert.task_id,
            repo_root: String::new(),
            project_id: Default::default(),
            parent_task_id: TaskId::root(),
            title: String::new(),
            current_command: String::new(),
            status: TaskStatus::Pending,
            sidecar_mode: Default::default(),
            description: String::new(),
            flag: false,
            flag_desc: String::new(),
            flag_readed: false,
            checked: false,
            archived: false,
            created_at: last_modified,
            last_modified,
            last_auto_progress_at: 0,
        });

        if !upsert.project_id.is_empty() {
            task.project_id = ProjectId::from(upsert.project_id.clone());
        }
        if let Some(v) = &upsert.title {
            task.title = v.clone();
        }
        if let Some(v) = &upsert.current_command {
            task.current_command = v.clone();
        }
        if let Some(v) = upsert.status {
            task.status = v;
        }
        if let Some(v) = upsert.sidecar_mode {
            task.sidecar_mode = v;
        }
        if let Some(v) = &upsert.description {
            task.description = v.clone();
        }
        if let Some(v) = upsert.flag {
            task.flag = v;
        }
        if let Some(v) = &upsert.flag_desc {
            task.flag_desc = v.clone();
        }
        if let Some(v) = upsert.flag_readed {
            task.flag_readed = v;
        }
        if let Some(v) = upsert.checked {
            task.checked = v;
        }
        if let Some(v) = upsert.archived {
            task.archived = v;
        }
        if let Some(v) = upsert.parent_task_id {
            task.parent_task_id = v;
        }
        task.last_modified = last_modified;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pw_core::TaskBuilder;

    #[test]
    fn upsert_task_meta_inserts_missing_row() {
        let mut state = MaterializedState::default();
        let upsert = pw_core::TaskMetaUpsert::new(TaskId::from_string("tsk-x")).title("hello");
        state.apply(&StoreOp::UpsertTaskMeta { upsert, last_modified: 100 });

        let task = &state.tasks[&TaskId::from_string("tsk-x")];
        assert_eq!(task.title, "hello");
        assert_eq!(task.last_modified, 100);
    }

    #[test]
    fn upsert_task_meta_preserves_absent_fields() {
        let mut state = MaterializedState::default();
        let task = TaskBuilder::default().task_id("tsk-y").title("first").build();
        state.apply(&StoreOp::InsertTask(task));

        let upsert = pw_core::TaskMetaUpsert::new(TaskId::from_string("tsk-y")).checked(true);
        state.apply(&StoreOp::UpsertTaskMeta { upsert, last_modified: 200 });

        let task = &state.tasks[&TaskId::from_string("tsk-y")];
        assert_eq!(task.title, "first");
        assert!(task.checked);
    }

    #[test]
    fn mark_bindings_stale_by_server_promotes_running_runs() {
        use pw_core::{RunBindingBuilder, TaskRunBuilder};

        let mut state = MaterializedState::default();
        let run = TaskRunBuilder::default().run_id(RunId::from_string("run-1")).build();
        state.apply(&StoreOp::InsertRun(run));
        let binding = RunBindingBuilder::default()
            .run_id(RunId::from_string("run-1"))
            .server_instance_id(ServerInstanceId::from("srvA"))
            .build();
        state.apply(&StoreOp::UpsertRunBinding(binding));

        state.apply(&StoreOp::MarkBindingsStaleByServer {
            server_instance_id: ServerInstanceId::from("srvA"),
            reason: "tmux_restarted".into(),
            now: 500,
        });

        let run = &state.task_runs[&RunId::from_string("run-1")];
        assert_eq!(run.run_status, RunStatus::NeedsRebind);
        let binding = &state.run_bindings[&RunId::from_string("run-1")];
        assert_eq!(binding.binding_status, BindingStatus::Stale);
        assert_eq!(binding.stale_reason.as_deref(), Some("tmux_restarted"));
    }
}
