//! End-to-end smoke test mirroring `pw-daemon`'s own startup wiring: config
//! load, store open, detector registration, and a lifecycle manager whose
//! shutdown chain flushes the store — across crate boundaries rather than
//! within any single crate's own unit tests.

use std::sync::Arc;

use pw_config::{ConfigStore, ProjectsStore};
use pw_core::SystemClock;
use pw_lifecycle::{CancellationToken, JobFailure, LifecycleManager};

#[tokio::test]
async fn config_store_detect_and_lifecycle_wire_together_to_a_clean_shutdown() {
    let dir = tempfile::tempdir().unwrap();

    let config = ConfigStore::load_or_init(dir.path()).unwrap();
    assert_eq!(config.local_port, pw_core::DEFAULT_LOCAL_PORT);

    let projects = ProjectsStore::new(dir.path());
    projects.add_project("proj-1".into(), "/repo", None).unwrap();

    let db = pw_store::init_global_db(dir.path().join("termteam.db"), SystemClock).unwrap();

    let detectors = pw_detect::process_registry().list();
    assert!(!detectors.is_empty());

    let manager = LifecycleManager::new();
    manager.add_run("worker", |ctx: CancellationToken| async move {
        ctx.cancelled().await;
        Ok(())
    });

    let flushed = Arc::new(tokio::sync::Mutex::new(false));
    let flush_flag = flushed.clone();
    let flush_db = db.clone();
    manager.add_shutdown("flush-store", move |_ctx: CancellationToken| {
        let flush_db = flush_db.clone();
        let flush_flag = flush_flag.clone();
        async move {
            flush_db.flush().map_err(|error| -> JobFailure { Box::new(error) })?;
            *flush_flag.lock().await = true;
            Ok(())
        }
    });

    let parent = CancellationToken::new();
    let parent_for_cancel = parent.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        parent_for_cancel.cancel();
    });

    manager.start_and_wait(parent, &[]).await.unwrap();

    assert!(*flushed.lock().await);
    assert_eq!(pw_store::global_db().unwrap().view(|s| s.tasks.len()), 0);
}
