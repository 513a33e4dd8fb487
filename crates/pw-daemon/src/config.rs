// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup paths. `spec.md` §6 keeps one directory for everything —
//! `config.toml`, `active-projects.json`, and the WAL — unlike the teacher's
//! split state-dir/config-dir layout, so this just derives the db path from
//! `pw_config::config_dir()` rather than tracking a second root.

use std::path::PathBuf;

use pw_config::{config_dir, APP_DIR_NAME};

pub struct Config {
    pub dir: PathBuf,
    pub db_path: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let dir = config_dir()?;
        std::fs::create_dir_all(&dir)?;
        let db_path = dir.join(format!("{APP_DIR_NAME}.db"));
        Ok(Self { dir, db_path })
    }
}
