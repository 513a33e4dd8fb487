// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// The error type a run- or shutdown-job returns. Cooperative cancellation
/// is not an error: a job that observes `CancellationToken::is_cancelled`
/// should return `Ok(())`, not construct one of these.
pub type JobFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("run job \"{name}\" failed: {source}")]
    RunJob {
        name: String,
        #[source]
        source: JobFailure,
    },

    #[error("run job panicked: {source}")]
    RunJobPanicked {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("shutdown job \"{name}\" failed: {source}")]
    ShutdownJob {
        name: String,
        #[source]
        source: JobFailure,
    },

    /// The joined set of (first run-job error ∪ shutdown-job errors) when
    /// more than one of them is present.
    #[error("{0:?}")]
    Many(Vec<LifecycleError>),
}
