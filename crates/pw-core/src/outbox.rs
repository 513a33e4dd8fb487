// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ActionOutbox` — at-least-once delivery queue for actions drained by an
//! external dispatcher.

use crate::ids::RunId;
use crate::status::OutboxStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutbox {
    pub id: u64,
    pub run_id: RunId,
    pub action_type: String,
    pub payload_json: Value,
    pub status: OutboxStatus,
    pub retry_count: u32,
    pub next_retry_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}
