//! Round-trip laws for the legacy pane/snapshot blobs (`spec.md` §8):
//! `SavePanes ∘ LoadPanes = identity` and `SavePaneSnapshots ∘
//! LoadPaneSnapshots = identity`, both scoped per `repo_root`, plus the
//! invariant that saving a snapshot never touches `tasks.last_modified`.

use std::sync::Arc;

use pw_core::{FakeClock, ProjectId, TaskBuilder};
use pw_store::{Db, ProjectStateRepository};
use serde_json::json;

fn repo(repo_root: &str) -> ProjectStateRepository<FakeClock> {
    repo_with_clock(repo_root).0
}

fn repo_with_clock(repo_root: &str) -> (ProjectStateRepository<FakeClock>, FakeClock) {
    let dir = tempfile::tempdir().unwrap().into_path();
    let clock = FakeClock::new();
    let db = Db::open(dir.join("state.wal"), clock.clone()).unwrap();
    (ProjectStateRepository::new(Arc::new(db), repo_root), clock)
}

#[test]
fn save_panes_load_panes_round_trips() {
    let repo = repo("/repo-a");
    let panes = json!({"panes": [{"id": "%1", "target": "botworks:1.0"}]});

    repo.save_panes(panes.clone()).unwrap();

    assert_eq!(repo.load_panes(), panes);
}

#[test]
fn save_pane_snapshots_load_pane_snapshots_round_trips() {
    let repo = repo("/repo-b");
    let snapshots = json!({"snapshots": {"%1": "last output line"}});

    repo.save_pane_snapshots(snapshots.clone()).unwrap();

    assert_eq!(repo.load_pane_snapshots(), snapshots);
}

#[test]
fn panes_and_snapshots_are_scoped_independently_per_repo_root() {
    let repo_a = repo("/repo-a");
    let repo_b = repo("/repo-b");

    repo_a.save_panes(json!({"owner": "a"})).unwrap();
    repo_b.save_panes(json!({"owner": "b"})).unwrap();

    assert_eq!(repo_a.load_panes(), json!({"owner": "a"}));
    assert_eq!(repo_b.load_panes(), json!({"owner": "b"}));
    assert_eq!(repo_a.load_pane_snapshots(), serde_json::Value::Null);
}

#[test]
fn save_pane_snapshots_preserves_task_last_modified_byte_for_byte() {
    let (repo, clock) = repo_with_clock("/repo-a");
    let project_id = ProjectId::from("p1");
    clock.advance(std::time::Duration::from_secs(424242));
    let task = TaskBuilder::default().task_id("tsk-1").project_id(project_id.clone()).build();
    repo.insert_task(task).unwrap();
    let last_modified = repo.list_tasks_by_project(&project_id)[0].last_modified;

    repo.save_pane_snapshots(json!({"snapshots": {"%1": "x"}})).unwrap();

    let tasks = repo.list_tasks_by_project(&project_id);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].last_modified, last_modified);
}
