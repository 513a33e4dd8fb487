// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ConfigStore` — `config.toml` load-or-init with normalization
//! (`spec.md` §4.E). `pw_core::GlobalConfig` owns the shape and the
//! normalization rule itself; this module owns the actual file I/O and the
//! one piece of state `normalize` needs from outside the document: whether
//! `defaults.session_program` was explicitly present, so an explicit value
//! always wins over the legacy fallback.

use std::path::{Path, PathBuf};

use pw_core::GlobalConfig;

use crate::error::ConfigError;
use crate::paths::atomic_write;

pub struct ConfigStore;

impl ConfigStore {
    fn path(dir: &Path) -> PathBuf {
        dir.join("config.toml")
    }

    /// Reads `config.toml` under `dir`. If it's missing, normalizes the
    /// built-in defaults and atomically writes the file; an existing file
    /// is normalized in memory on every read (the legacy field, once
    /// folded in, is dropped from the next [`Self::save`]).
    pub fn load_or_init(dir: &Path) -> Result<GlobalConfig, ConfigError> {
        match std::fs::read_to_string(Self::path(dir)) {
            Ok(contents) => {
                let mut config: GlobalConfig = toml::from_str(&contents)?;
                config.defaults.session_program_explicit = session_program_was_explicit(&contents)?;
                config.normalize();
                Ok(config)
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(dir = %dir.display(), "no config.toml found, writing defaults");
                let mut config = GlobalConfig::default();
                config.normalize();
                Self::save(dir, &config)?;
                Ok(config)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Atomically writes `config`; the legacy `default_launch_program`
    /// field is skipped when `None`, so a normalized config never carries
    /// it forward.
    pub fn save(dir: &Path, config: &GlobalConfig) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        atomic_write(&Self::path(dir), contents.as_bytes())
    }
}

/// `GlobalConfig`'s own `#[serde(skip)]` flag can't be populated by
/// deserializing the typed struct directly, since a skipped field is never
/// visited. Parsed as a loose [`toml::Value`] instead, purely to check
/// whether `[defaults] session_program` was present in the document.
fn session_program_was_explicit(contents: &str) -> Result<Option<()>, ConfigError> {
    let value: toml::Value = toml::from_str(contents)?;
    let present = value
        .get("defaults")
        .and_then(|defaults| defaults.get("session_program"))
        .is_some();
    Ok(present.then_some(()))
}
