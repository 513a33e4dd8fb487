// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GlobalConfig` — the singleton TOML document at `config.toml`.
//!
//! This module only defines the shape and its normalization rule; reading,
//! atomic writing, and the legacy-field migration live in `pw-config`
//! (component E), which carries the actual file I/O the way the teacher's
//! daemon crate carries its own config loading.

use crate::status::{HelperProgram, SessionProgram};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCAL_PORT: u16 = 4621;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub local_port: u16,
    pub defaults: ConfigDefaults,
    pub task_completion: TaskCompletionConfig,
    /// Legacy pre-run-centric field, read if present and cleared on write.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_launch_program: Option<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            local_port: DEFAULT_LOCAL_PORT,
            defaults: ConfigDefaults::default(),
            task_completion: TaskCompletionConfig::default(),
            default_launch_program: None,
        }
    }
}

impl GlobalConfig {
    /// Applies the normalization rules from `spec.md` §4.E in place. The
    /// legacy field is always cleared afterward — callers persist the
    /// normalized form, never the legacy one.
    pub fn normalize(&mut self) {
        if self.local_port == 0 {
            self.local_port = DEFAULT_LOCAL_PORT;
        }
        if let Some(legacy) = self.default_launch_program.take() {
            if self.defaults.session_program_explicit.is_none() {
                if let Some(parsed) = SessionProgram::parse_legacy(&legacy) {
                    self.defaults.session_program = parsed;
                }
            }
        }
        self.task_completion.normalize();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub session_program: SessionProgram,
    pub helper_program: HelperProgram,
    /// Not serialized — tracks whether `session_program` was explicitly set
    /// by this load so `normalize` only falls back to the legacy field when
    /// the caller didn't already provide one.
    #[serde(skip)]
    pub session_program_explicit: Option<()>,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            session_program: SessionProgram::Shell,
            helper_program: HelperProgram::Codex,
            session_program_explicit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCompletionConfig {
    pub notify_enabled: bool,
    pub notify_command: String,
    pub notify_idle_duration_seconds: i64,
}

impl Default for TaskCompletionConfig {
    fn default() -> Self {
        Self {
            notify_enabled: false,
            notify_command: String::new(),
            notify_idle_duration_seconds: 0,
        }
    }
}

impl TaskCompletionConfig {
    pub fn normalize(&mut self) {
        if self.notify_command.trim().is_empty() {
            self.notify_enabled = false;
        }
        if self.notify_idle_duration_seconds < 0 {
            self.notify_idle_duration_seconds = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_zero_port_falls_back_to_default() {
        let mut cfg = GlobalConfig { local_port: 0, ..GlobalConfig::default() };
        cfg.normalize();
        assert_eq!(cfg.local_port, DEFAULT_LOCAL_PORT);
    }

    #[test]
    fn normalize_forces_notify_disabled_when_command_blank() {
        let mut cfg = GlobalConfig::default();
        cfg.task_completion.notify_enabled = true;
        cfg.normalize();
        assert!(!cfg.task_completion.notify_enabled);
    }

    #[test]
    fn normalize_clamps_negative_idle_duration() {
        let mut cfg = GlobalConfig::default();
        cfg.task_completion.notify_idle_duration_seconds = -5;
        cfg.normalize();
        assert_eq!(cfg.task_completion.notify_idle_duration_seconds, 0);
    }

    #[test]
    fn normalize_takes_legacy_launch_program_when_recognized() {
        let mut cfg = GlobalConfig {
            default_launch_program: Some("claude".to_string()),
            ..GlobalConfig::default()
        };
        cfg.normalize();
        assert_eq!(cfg.defaults.session_program, SessionProgram::Claude);
        assert!(cfg.default_launch_program.is_none());
    }
}
