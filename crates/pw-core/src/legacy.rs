// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `LegacyState` — opaque JSON blobs keyed by `(repo_root, state_key)`,
//! used by the two pre-run-centric storage formats this system still reads
//! and writes: pane bindings and pane snapshot frames.

use serde_json::Value;

/// `panes_json` — pane bindings per repo.
pub const PANES_KEY: &str = "panes_json";

/// `pane_snapshots_json` — per-pane frame data.
pub const SNAPSHOTS_KEY: &str = "pane_snapshots_json";

#[derive(Debug, Clone, PartialEq)]
pub struct LegacyState {
    pub repo_root: String,
    pub state_key: String,
    pub value_json: Value,
    pub updated_at: i64,
}
