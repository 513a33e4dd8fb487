// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RunEvent` — append-only event log entries keyed by auto id.

use crate::ids::RunId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub id: u64,
    pub run_id: RunId,
    pub event_type: String,
    pub payload_json: Value,
    pub created_at: i64,
}
