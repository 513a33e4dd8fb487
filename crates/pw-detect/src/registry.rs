// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ProgramRegistry` — ordered, mutex-guarded collection of detectors, with
//! a process-wide instance the built-ins self-register into at startup.

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::builtin::{antigravity_detector, claude_detector, cursor_detector, CodexDetector, ShellDetector};
use crate::detector::ProgramDetector;
use crate::error::DetectError;

#[derive(Default)]
pub struct ProgramRegistry {
    detectors: Mutex<Vec<Arc<dyn ProgramDetector>>>,
}

impl ProgramRegistry {
    pub fn new() -> Self {
        Self { detectors: Mutex::new(Vec::new()) }
    }

    /// Registers `detector`. Errors if `program_id` is already registered;
    /// registration order is otherwise preserved.
    pub fn register(&self, detector: Arc<dyn ProgramDetector>) -> Result<(), DetectError> {
        let mut detectors = self.detectors.lock();
        if detectors.iter().any(|d| d.program_id() == detector.program_id()) {
            return Err(DetectError::DuplicateProgramId(detector.program_id().to_string()));
        }
        detectors.push(detector);
        Ok(())
    }

    /// Point lookup by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn ProgramDetector>> {
        self.detectors.lock().iter().find(|d| d.program_id() == id).cloned()
    }

    /// First detector (in registration order) whose `match_current_command`
    /// returns true for `cmd`.
    pub fn detect_by_current_command(&self, cmd: &str) -> Option<Arc<dyn ProgramDetector>> {
        self.detectors.lock().iter().find(|d| d.match_current_command(cmd)).cloned()
    }

    /// Detectors in registration order.
    pub fn list(&self) -> Vec<Arc<dyn ProgramDetector>> {
        self.detectors.lock().clone()
    }
}

static PROCESS_REGISTRY: OnceLock<ProgramRegistry> = OnceLock::new();

/// The process-wide registry, with built-ins self-registered on first
/// access (`codex`, `claude`, `cursor`, `antigravity`, `shell`, in that
/// order — duplicate registration at this call site can never happen since
/// `OnceLock` runs the initializer exactly once).
#[allow(clippy::expect_used)]
pub fn process_registry() -> &'static ProgramRegistry {
    PROCESS_REGISTRY.get_or_init(|| {
        let registry = ProgramRegistry::new();
        registry.register(Arc::new(CodexDetector)).expect("codex registers once");
        registry.register(Arc::new(claude_detector())).expect("claude registers once");
        registry.register(Arc::new(cursor_detector())).expect("cursor registers once");
        registry.register(Arc::new(antigravity_detector())).expect("antigravity registers once");
        registry.register(Arc::new(ShellDetector)).expect("shell registers once");
        registry
    })
}
