// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ProgramDetector` — one supervised program's availability check, command
//! matching, and prompt-delivery recipe (`spec.md` §4.C).

use std::time::Duration;

use crate::error::DetectError;

/// One step in delivering a prompt to a pane: send `input`, wait `delay`
/// before the next step (if any), then allow up to `timeout` for the
/// program to acknowledge it before the caller gives up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptStep {
    pub input: String,
    pub delay: Duration,
    pub timeout: Duration,
}

impl PromptStep {
    pub fn new(input: impl Into<String>, delay: Duration, timeout: Duration) -> Self {
        Self { input: input.into(), delay, timeout }
    }
}

/// A supervised program family (codex, claude, cursor, antigravity, a plain
/// shell, ...). Implementors are self-registered into a [`crate::registry::
/// ProgramRegistry`] at daemon startup.
pub trait ProgramDetector: Send + Sync {
    /// Lowercase identifier, e.g. `"codex"`.
    fn program_id(&self) -> &str;

    /// Whether the program's binary is reachable on `PATH`. Transient I/O
    /// errors (a `PATH` entry that can't be read, a permissions error) are
    /// swallowed to `false` rather than propagated.
    fn is_available(&self) -> bool {
        crate::which::on_path(self.program_id())
    }

    /// Heuristic match against a pane's current foreground command: the
    /// lower-cased, trimmed command's first field equals `program_id`, or
    /// the full command contains one of `"NAME ("`, `"(NAME)"`, `"/NAME"`,
    /// `"\NAME"` — tolerating wrappers like `sh -c codex` or title-ified
    /// forms.
    fn match_current_command(&self, cmd: &str) -> bool {
        let needle = self.program_id();
        let trimmed = cmd.trim().to_lowercase();
        if trimmed.split_whitespace().next() == Some(needle) {
            return true;
        }
        let patterns = [
            format!("{needle} ("),
            format!("({needle})"),
            format!("/{needle}"),
            format!("\\{needle}"),
        ];
        patterns.iter().any(|p| trimmed.contains(p.as_str()))
    }

    /// Whether the pane has left this program's foreground command.
    /// Default: the negation of [`Self::match_current_command`].
    fn has_exited_mode(&self, current_command: &str) -> bool {
        !self.match_current_command(current_command)
    }

    /// Ordered steps for delivering `prompt` to this program's pane.
    fn build_input_prompt_steps(&self, prompt: &str) -> Result<Vec<PromptStep>, DetectError>;
}

pub(crate) fn require_prompt(prompt: &str) -> Result<(), DetectError> {
    if prompt.trim().is_empty() {
        return Err(DetectError::EmptyPrompt);
    }
    Ok(())
}
