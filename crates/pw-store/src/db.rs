// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Db` — the embedded store: a WAL-backed [`MaterializedState`] behind one
//! lock, plus the process-wide singleton the repository layer attaches to.
//!
//! The teacher threads an `Arc<Mutex<MaterializedState>>` through its
//! listener/engine call sites and emits domain events that a separate
//! consumer applies to state. This system has no such event-bus hop: every
//! write must land as a single atomic WAL-append-then-apply (`spec.md`
//! §4.B — "single atomic statement, not read-modify-write"), so `Db::transact`
//! folds lock+inspect+append+apply into one critical section instead.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::error::StoreError;
use crate::migration::{MigrationRegistry, CURRENT_SCHEMA_VERSION};
use crate::ops::StoreOp;
use crate::state::MaterializedState;
use crate::wal::Wal;
use pw_core::{Clock, SystemClock};

struct Inner {
    wal: Wal<StoreOp>,
    state: MaterializedState,
}

/// Embedded store for one daemon process, generic over its [`Clock`] the
/// way the teacher's `Runtime<A, N, C: Clock>` is — production code uses
/// `Db<SystemClock>` ([`Db::open`]); tests swap in `Db<FakeClock>`.
pub struct Db<C: Clock = SystemClock> {
    inner: Mutex<Inner>,
    clock: C,
    path: Option<PathBuf>,
}

struct GlobalSlot {
    path: PathBuf,
    db: Arc<Db<SystemClock>>,
}

static GLOBAL_DB: OnceLock<Mutex<Option<GlobalSlot>>> = OnceLock::new();

fn global_slot() -> &'static Mutex<Option<GlobalSlot>> {
    GLOBAL_DB.get_or_init(|| Mutex::new(None))
}

/// Installs the process-wide global database, opening it at `path` with
/// `clock`. Idempotent when called with the same path — the existing
/// handle is returned without reopening. Called with a different path,
/// the prior handle is dropped from the slot (its file closes once every
/// other outstanding `Arc` clone of it is also dropped) and a fresh one is
/// opened and installed in its place. `spec.md` §4.A.
pub fn init_global_db(
    path: impl AsRef<Path>,
    clock: SystemClock,
) -> Result<Arc<Db<SystemClock>>, StoreError> {
    let path = path.as_ref();
    let mut slot = global_slot().lock();
    if let Some(existing) = slot.as_ref() {
        if existing.path == path {
            return Ok(existing.db.clone());
        }
    }
    let db = Arc::new(Db::open(path, clock)?);
    *slot = Some(GlobalSlot { path: path.to_path_buf(), db: db.clone() });
    Ok(db)
}

/// Returns the process-wide global database, if [`init_global_db`] has run.
pub fn global_db() -> Result<Arc<Db<SystemClock>>, StoreError> {
    global_slot().lock().as_ref().map(|slot| slot.db.clone()).ok_or(StoreError::MissingDb)
}

impl<C: Clock> Db<C> {
    /// Opens (or creates) the WAL file at `path`, replaying it into a fresh
    /// [`MaterializedState`], with `clock` driving every op's embedded
    /// timestamp default. `path` also accepts the `:memory:` /
    /// `memory://<name>` DSN forms (`spec.md` §4.A) — those never touch
    /// the filesystem, so the directory-preparation step below is skipped
    /// for them (a bare `Path::parent()` on a DSN string is meaningless
    /// and must never be handed to `create_dir_all`).
    pub fn open(path: impl AsRef<Path>, clock: C) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(StoreError::EmptyDbPath);
        }
        if crate::wal::memory_dsn_name(path).is_none() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let wal: Wal<StoreOp> = Wal::open(path, 0)?;
        let mut state = MaterializedState::default();
        for entry in wal.entries_after(0)? {
            state.apply(&entry.event);
        }

        Ok(Self { inner: Mutex::new(Inner { wal, state }), clock, path: Some(path.to_path_buf()) })
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Runs `f` under the store's single lock. `f` inspects the current
    /// state and returns the value to hand back to the caller plus an
    /// optional [`StoreOp`] to commit. When `Some`, the op is appended to
    /// the WAL and applied to `state` before the lock is released — so a
    /// check (duplicate key, monotonic comparison) and the write it gates
    /// never race with a concurrent writer.
    pub fn transact<T>(
        &self,
        f: impl FnOnce(&MaterializedState, &C) -> Result<(T, Option<StoreOp>), StoreError>,
    ) -> Result<T, StoreError> {
        let mut inner = self.inner.lock();
        let (value, op) = f(&inner.state, &self.clock)?;
        if let Some(op) = op {
            inner.wal.append(&op)?;
            if inner.wal.needs_flush() {
                inner.wal.flush()?;
            }
            inner.state.apply(&op);
        }
        Ok(value)
    }

    /// Read-only access to the materialized state, for list/get operations
    /// that never write.
    pub fn view<T>(&self, f: impl FnOnce(&MaterializedState) -> T) -> T {
        let inner = self.inner.lock();
        f(&inner.state)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.inner.lock().wal.flush()?;
        Ok(())
    }

    /// Applies migrations to a raw JSON snapshot before it would be
    /// replayed. Not wired into [`Db::open`] directly since this store's
    /// durable log is the WAL itself rather than a separate snapshot file;
    /// kept for the daemon's startup path when reading an externally
    /// produced snapshot (e.g. imported from an older build).
    pub fn migrate_snapshot(
        registry: &MigrationRegistry,
        snapshot: serde_json::Value,
    ) -> Result<serde_json::Value, StoreError> {
        Ok(registry.migrate_to(snapshot, CURRENT_SCHEMA_VERSION)?)
    }
}
