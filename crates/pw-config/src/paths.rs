// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config directory resolution and atomic file writes (`spec.md` §4.E, §6).

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const APP_DIR_NAME: &str = "termteam";

/// `${TERMTEAM_CONFIG_DIR or SHELLMAN_CONFIG_DIR}` env override, else
/// `~/.config/<app>`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os("TERMTEAM_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(dir) = std::env::var_os("SHELLMAN_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME)).ok_or(ConfigError::NoHomeDir)
}

/// Writes `contents` to `path` via a sibling `.tmp` file plus rename, so
/// readers never observe a partially-written file.
pub(crate) fn atomic_write(path: &Path, contents: &[u8]) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
