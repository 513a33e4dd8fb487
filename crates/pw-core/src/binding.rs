// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RunBinding` — the association `run ↔ pane` on a given server instance.

use crate::ids::{PaneId, PaneTarget, RunId, ServerInstanceId};
use crate::status::BindingStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunBinding {
    pub run_id: RunId,
    pub server_instance_id: ServerInstanceId,
    pub pane_id: PaneId,
    pub pane_target: PaneTarget,
    pub binding_status: BindingStatus,
    pub stale_reason: Option<String>,
    pub updated_at: i64,
}

crate::builder! {
    pub struct RunBindingBuilder => RunBinding {
        set {
            run_id: RunId = RunId::new(),
            server_instance_id: ServerInstanceId = ServerInstanceId::default(),
            pane_id: PaneId = PaneId::default(),
            pane_target: PaneTarget = PaneTarget::default(),
            binding_status: BindingStatus = BindingStatus::Live,
            stale_reason: Option<String> = None,
            updated_at: i64 = 0,
        }
    }
}
