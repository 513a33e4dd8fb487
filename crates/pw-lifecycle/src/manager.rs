// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `LifecycleManager` — composes run jobs and a shutdown chain under signal
//! cancellation (`spec.md` §4.D).

use std::future::Future;

use parking_lot::Mutex;
use tokio::signal::unix::SignalKind;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::error::{JobFailure, LifecycleError};
use crate::job::{boxed, NamedJob};

/// Composes two ordered collections, `run_jobs` and `shutdown_jobs`, each
/// holding named functions over a cancellable context. Job lists are
/// snapshotted (cloned) at the start of `start_and_wait` so registrations
/// added concurrently are not observed mid-run.
///
/// There is no Rust equivalent of "a nil function is a silent no-op" —
/// function values can't be null here — so callers simply don't register a
/// job they don't have.
#[derive(Default)]
pub struct LifecycleManager {
    run_jobs: Mutex<Vec<NamedJob>>,
    shutdown_jobs: Mutex<Vec<NamedJob>>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a long-lived worker. `job` is driven concurrently with the
    /// others until it returns; cooperative jobs should await
    /// `run_ctx.cancelled()` (or poll `is_cancelled()`) and return `Ok(())`
    /// rather than treat cancellation as a failure.
    pub fn add_run<F, Fut>(&self, name: impl Into<String>, job: F)
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), JobFailure>> + Send + 'static,
    {
        self.run_jobs.lock().push(NamedJob { name: name.into(), run: boxed(job) });
    }

    /// Registers a shutdown step, run in registration order after every
    /// run job has observed cancellation. Each shutdown job gets a fresh,
    /// never-cancelled background context so it can finish its own work
    /// after the parent context has already been cancelled.
    pub fn add_shutdown<F, Fut>(&self, name: impl Into<String>, job: F)
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), JobFailure>> + Send + 'static,
    {
        self.shutdown_jobs.lock().push(NamedJob { name: name.into(), run: boxed(job) });
    }

    /// 1. Derives `ctx` from `parent_ctx`, cancelling on any of `signals`.
    /// 2. Derives `run_ctx` from `ctx`; starts every run job concurrently.
    /// 3. Waits for the first of: `ctx` cancellation, a run job erroring, or
    ///    all run jobs finishing. On error, cancels `run_ctx`.
    /// 4. Always waits for every run job to observe cancellation.
    /// 5. Runs every shutdown job in registration order.
    /// 6. Returns the joined set of (first run error ∪ shutdown errors).
    pub async fn start_and_wait(
        &self,
        parent_ctx: CancellationToken,
        signals: &[SignalKind],
    ) -> Result<(), LifecycleError> {
        let ctx = parent_ctx.child_token();
        let signal_tasks: Vec<JoinHandle<()>> =
            signals.iter().map(|kind| spawn_signal_listener(*kind, ctx.clone())).collect();

        let run_ctx = ctx.child_token();
        let run_jobs = self.run_jobs.lock().clone();

        let mut join_set: JoinSet<(String, Result<(), JobFailure>)> = JoinSet::new();
        for job in &run_jobs {
            let run_ctx = run_ctx.clone();
            let job = job.clone();
            join_set.spawn(async move {
                let result = (job.run)(run_ctx).await;
                (job.name, result)
            });
        }

        let run_error = if run_jobs.is_empty() {
            ctx.cancelled().await;
            None
        } else {
            wait_for_run_jobs(&ctx, &run_ctx, &mut join_set).await
        };

        run_ctx.cancel();
        while join_set.join_next().await.is_some() {}

        for task in signal_tasks {
            task.abort();
        }

        let shutdown_jobs = self.shutdown_jobs.lock().clone();
        let shutdown_errors = run_shutdown_jobs(&shutdown_jobs).await;

        join_results(run_error, shutdown_errors)
    }
}

fn spawn_signal_listener(kind: SignalKind, ctx: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::unix::signal(kind) {
            Ok(mut stream) => {
                tokio::select! {
                    _ = stream.recv() => ctx.cancel(),
                    _ = ctx.cancelled() => {}
                }
            }
            Err(error) => tracing::warn!(%error, "failed to install signal handler"),
        }
    })
}

async fn wait_for_run_jobs(
    ctx: &CancellationToken,
    run_ctx: &CancellationToken,
    join_set: &mut JoinSet<(String, Result<(), JobFailure>)>,
) -> Option<LifecycleError> {
    loop {
        tokio::select! {
            _ = ctx.cancelled() => return None,
            joined = join_set.join_next() => {
                match joined {
                    None => return None,
                    Some(Ok((_, Ok(())))) => continue,
                    Some(Ok((name, Err(source)))) => {
                        run_ctx.cancel();
                        return Some(LifecycleError::RunJob { name, source });
                    }
                    Some(Err(source)) => {
                        run_ctx.cancel();
                        return Some(LifecycleError::RunJobPanicked { source });
                    }
                }
            }
        }
    }
}

async fn run_shutdown_jobs(shutdown_jobs: &[NamedJob]) -> Vec<LifecycleError> {
    let mut errors = Vec::new();
    for job in shutdown_jobs {
        let background = CancellationToken::new();
        if let Err(source) = (job.run)(background).await {
            tracing::warn!(job = %job.name, %source, "shutdown job failed");
            errors.push(LifecycleError::ShutdownJob { name: job.name.clone(), source });
        }
    }
    errors
}

fn join_results(
    run_error: Option<LifecycleError>,
    mut shutdown_errors: Vec<LifecycleError>,
) -> Result<(), LifecycleError> {
    match (run_error, shutdown_errors.is_empty()) {
        (None, true) => Ok(()),
        (Some(error), true) => Err(error),
        (None, false) if shutdown_errors.len() == 1 => Err(shutdown_errors.remove(0)),
        (None, false) => Err(LifecycleError::Many(shutdown_errors)),
        (Some(error), false) => {
            let mut all = vec![error];
            all.append(&mut shutdown_errors);
            Err(LifecycleError::Many(all))
        }
    }
}
