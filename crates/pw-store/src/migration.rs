// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned migrations over the store's JSON snapshot, applied on open so
//! an older on-disk snapshot is brought forward to the schema this build
//! expects before WAL replay begins.

use serde_json::Value;
use thiserror::Error;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MigrationError {
    #[error("snapshot version {0} is newer than the highest supported version {1}")]
    TooNew(u32, u32),
    #[error("no migration path from version {0} to {1}")]
    NoPath(u32, u32),
}

/// One step in the migration chain: `source_version -> target_version`.
pub trait Migration {
    fn source_version(&self) -> u32;
    fn target_version(&self) -> u32;
    fn migrate(&self, snapshot: &mut Value) -> Result<(), MigrationError>;
}

/// Ordered set of registered migrations, walked greedily from the
/// snapshot's declared version to `target`.
pub struct MigrationRegistry {
    pub(crate) migrations: Vec<Box<dyn Migration + Send + Sync>>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self { migrations: Vec::new() }
    }

    /// Migrates `snapshot` (expected to carry a top-level `"v"` field) to
    /// `target`. A no-op when already at `target`.
    pub fn migrate_to(&self, mut snapshot: Value, target: u32) -> Result<Value, MigrationError> {
        let mut current = snapshot
            .get("v")
            .and_then(Value::as_u64)
            .map(|v| v as u32)
            .unwrap_or(CURRENT_SCHEMA_VERSION);

        if current == target {
            return Ok(snapshot);
        }
        if current > target {
            return Err(MigrationError::TooNew(current, target));
        }

        while current < target {
            let step = self
                .migrations
                .iter()
                .find(|m| m.source_version() == current)
                .ok_or(MigrationError::NoPath(current, target))?;
            step.migrate(&mut snapshot)?;
            current = step.target_version();
            if let Some(obj) = snapshot.as_object_mut() {
                obj.insert("v".into(), current.into());
            }
        }
        Ok(snapshot)
    }
}

impl Default for MigrationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn migrate_same_version_is_noop() {
        let v1 = json!({"v": 1, "seq": 1, "state": {}});
        let registry = MigrationRegistry::new();
        let result = registry.migrate_to(v1.clone(), 1).unwrap();
        assert_eq!(result, v1);
    }

    #[test]
    fn too_new_is_an_error() {
        let v99 = json!({"v": 99, "seq": 1, "state": {}});
        let registry = MigrationRegistry::new();
        assert_eq!(registry.migrate_to(v99, 1), Err(MigrationError::TooNew(99, 1)));
    }

    #[test]
    fn no_registered_path_is_an_error() {
        let v1 = json!({"v": 1, "seq": 1, "state": {}});
        let registry = MigrationRegistry::new();
        assert_eq!(registry.migrate_to(v1, 2), Err(MigrationError::NoPath(1, 2)));
    }

    struct MockV1ToV2;

    impl Migration for MockV1ToV2 {
        fn source_version(&self) -> u32 {
            1
        }
        fn target_version(&self) -> u32 {
            2
        }
        fn migrate(&self, snapshot: &mut Value) -> Result<(), MigrationError> {
            if let Some(obj) = snapshot.as_object_mut() {
                obj.insert("migrated".into(), true.into());
            }
            Ok(())
        }
    }

    #[test]
    fn migration_chain_runs_in_order() {
        let mut registry = MigrationRegistry::new();
        registry.migrations.push(Box::new(MockV1ToV2));

        let v1 = json!({"v": 1, "seq": 42, "state": {}});
        let result = registry.migrate_to(v1, 2).unwrap();

        assert_eq!(result["v"], 2);
        assert_eq!(result["seq"], 42);
        assert_eq!(result["migrated"], true);
    }
}
