// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ActiveProject` — one repository the daemon currently tracks, persisted
//! as a JSON list at `active-projects.json`.

use crate::ids::ProjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveProject {
    pub project_id: ProjectId,
    pub repo_root: String,
    /// Defaults to `project_id` when blank — enforced by the store that
    /// writes this record, not by this type.
    pub display_name: String,
    pub updated_at: i64,
}
