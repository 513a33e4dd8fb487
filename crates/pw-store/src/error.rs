// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds the core must distinguish (`spec.md` §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("global DB not initialized")]
    MissingDb,

    #[error("db path is required")]
    EmptyDbPath,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Distinguishable sentinel for `InsertCompletionInbox` unique-key
    /// conflicts — matched on the variant, never on the message text.
    #[error("duplicate completion inbox request for run {run_id}, request {request_id}")]
    DuplicateInboxRequest { run_id: String, request_id: String },

    #[error(transparent)]
    Migration(#[from] crate::migration::MigrationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("fatal: {0}")]
    Fatal(String),
}

impl StoreError {
    pub fn is_duplicate_inbox_request(&self) -> bool {
        matches!(self, Self::DuplicateInboxRequest { .. })
    }
}
