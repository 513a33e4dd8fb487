// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process lifecycle: ordered run/shutdown job lists cancelled by signal
//! (`spec.md` §4.D).

mod error;
mod job;
mod manager;

pub use error::{JobFailure, LifecycleError};
pub use manager::LifecycleManager;
pub use tokio::signal::unix::SignalKind;
pub use tokio_util::sync::CancellationToken;
