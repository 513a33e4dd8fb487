// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pwd` — the daemon binary. Loads config, opens the store, registers the
//! built-in program detectors, and blocks on [`LifecycleManager`] until
//! `SIGINT`/`SIGTERM`. No listener is started here: draining the
//! [`pw_core::ActionOutbox`] and dispatching runs to panes is an external
//! dispatcher's job (`spec.md` §4.F, out of scope for this crate).

mod config;

use pw_config::ConfigStore;
use pw_core::SystemClock;
use pw_lifecycle::{CancellationToken, JobFailure, LifecycleManager, SignalKind};
use tracing::info;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load()?;
    let global_config = ConfigStore::load_or_init(&config.dir)?;
    info!(
        dir = %config.dir.display(),
        local_port = global_config.local_port,
        "starting daemon"
    );

    let db = pw_store::init_global_db(&config.db_path, SystemClock)?;

    let detectors = pw_detect::process_registry().list();
    info!(count = detectors.len(), "program detectors registered");

    let manager = LifecycleManager::new();

    manager.add_run("idle", |run_ctx: CancellationToken| async move {
        run_ctx.cancelled().await;
        Ok(())
    });

    let flush_db = db.clone();
    manager.add_shutdown("flush-store", move |_ctx: CancellationToken| {
        let db = flush_db.clone();
        async move { db.flush().map_err(|error| -> JobFailure { Box::new(error) }) }
    });

    manager
        .start_and_wait(CancellationToken::new(), &[SignalKind::interrupt(), SignalKind::terminate()])
        .await?;

    info!("daemon stopped");
    Ok(())
}
