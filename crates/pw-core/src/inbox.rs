// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `CompletionInbox` — at-most-once admission queue for external completion
//! callbacks, unique on `(run_id, request_id)`.

use crate::ids::{RequestId, RunId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionInbox {
    pub run_id: RunId,
    pub request_id: RequestId,
    pub summary: String,
    pub source: String,
    pub created_at: i64,
}
