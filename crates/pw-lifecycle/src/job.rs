// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::JobFailure;

pub(crate) type JobFuture = Pin<Box<dyn Future<Output = Result<(), JobFailure>> + Send>>;
pub(crate) type JobFn = Arc<dyn Fn(CancellationToken) -> JobFuture + Send + Sync>;

/// A registered job: a name (for error attribution and logging) plus the
/// boxed, reusable function a run list is snapshotted into at start time.
#[derive(Clone)]
pub(crate) struct NamedJob {
    pub name: String,
    pub run: JobFn,
}

pub(crate) fn boxed<F, Fut>(job: F) -> JobFn
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), JobFailure>> + Send + 'static,
{
    Arc::new(move |ctx| -> JobFuture { Box::pin(job(ctx)) })
}
