// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `StoreOp` — the WAL payload type. Each variant is one durable
//! transaction: everything it touches in [`crate::state::MaterializedState`]
//! is applied under the single mutex held by [`crate::db::Db::transact`],
//! so a variant bundling several sub-mutations (e.g.
//! [`StoreOp::MarkBindingsStaleByServer`]) commits all of them atomically
//! or none at all.

use pw_core::{
    GlobalConfig, MessageStatus, PmSessionId, ProjectId, RequestId, RunBinding, RunId, RunStatus,
    RuntimeBatch, ServerInstanceId, Task, TaskId, TaskMetaUpsert, TaskRun,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreOp {
    InsertTask(Task),
    UpsertTaskMeta { upsert: TaskMetaUpsert, last_modified: i64 },
    ArchiveCheckedTasksByProject { repo_root: String, project_id: ProjectId, now: i64 },
    DeleteTask { repo_root: String, task_id: TaskId },
    MarkAutoProgressObserved { repo_root: String, task_id: TaskId, observed_at: i64 },

    InsertRun(TaskRun),
    UpsertRunBinding(RunBinding),
    MarkBindingsStaleByServer { server_instance_id: ServerInstanceId, reason: String, now: i64 },
    MarkRunCompleted { run_id: RunId, now: i64 },
    SetRunStatus { run_id: RunId, status: RunStatus, now: i64 },
    AppendRunEvent { run_id: RunId, event_type: String, payload_json: Value, now: i64 },
    EnqueueRunAction { run_id: RunId, action_type: String, payload_json: Value, now: i64 },
    InsertCompletionInbox {
        run_id: RunId,
        request_id: RequestId,
        summary: String,
        source: String,
        now: i64,
    },

    BatchUpsertRuntime { repo_root: String, batch: RuntimeBatch, now: i64 },
    SaveLegacyState { repo_root: String, state_key: String, value_json: Value, now: i64 },

    CreatePmSession {
        session_id: PmSessionId,
        repo_root: String,
        project_id: ProjectId,
        title: String,
        now_ms: i64,
    },
    InsertPmMessage {
        session_id: PmSessionId,
        role: String,
        content: String,
        status: MessageStatus,
        err: Option<String>,
        now_ms: i64,
    },
    UpdatePmMessage {
        message_id: u64,
        content: Option<String>,
        status: Option<MessageStatus>,
        err: Option<String>,
        now_ms: i64,
    },

    InsertTaskNote { task_id: TaskId, content: String, now: i64 },
    UpdateTaskNote { note_id: u64, content: String, now: i64 },
    InsertTaskMessage {
        task_id: TaskId,
        role: String,
        content: String,
        status: MessageStatus,
        err: Option<String>,
        now: i64,
    },

    /// Mirrors the last-loaded global config into the embedded store's
    /// `config` table (required by the migration set, §4.A); `config.toml`
    /// in `pw-config` remains the authoritative copy.
    MirrorConfig(GlobalConfig),
}
