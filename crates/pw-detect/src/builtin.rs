// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in program detectors and their step tables (`spec.md` §4.C).

use std::time::Duration;

use crate::detector::{require_prompt, ProgramDetector, PromptStep};
use crate::error::DetectError;

/// `codex`: prompt, then a bare carriage return after a short delay — codex
/// needs a nudge to actually submit after the paste lands.
pub struct CodexDetector;

impl ProgramDetector for CodexDetector {
    fn program_id(&self) -> &str {
        "codex"
    }

    fn build_input_prompt_steps(&self, prompt: &str) -> Result<Vec<PromptStep>, DetectError> {
        require_prompt(prompt)?;
        Ok(vec![
            PromptStep::new(prompt, Duration::ZERO, Duration::from_millis(15_000)),
            PromptStep::new("\r", Duration::from_millis(50), Duration::from_millis(1_000)),
        ])
    }
}

/// `claude`, `cursor`, `antigravity`: prompt followed by a newline, no
/// extra delay — all three submit on `\n` without needing a settle step.
struct NewlineSubmitDetector {
    program_id: &'static str,
}

impl ProgramDetector for NewlineSubmitDetector {
    fn program_id(&self) -> &str {
        self.program_id
    }

    fn build_input_prompt_steps(&self, prompt: &str) -> Result<Vec<PromptStep>, DetectError> {
        require_prompt(prompt)?;
        Ok(vec![
            PromptStep::new(prompt, Duration::ZERO, Duration::from_millis(15_000)),
            PromptStep::new("\n", Duration::ZERO, Duration::from_millis(1_000)),
        ])
    }
}

pub fn claude_detector() -> impl ProgramDetector {
    NewlineSubmitDetector { program_id: "claude" }
}

pub fn cursor_detector() -> impl ProgramDetector {
    NewlineSubmitDetector { program_id: "cursor" }
}

pub fn antigravity_detector() -> impl ProgramDetector {
    NewlineSubmitDetector { program_id: "antigravity" }
}

/// `shell`: always available (it's the pane's fallback program), and
/// delivers a prompt the same way the newline-submit family does — a plain
/// shell has no richer acknowledgement to wait for.
pub struct ShellDetector;

impl ProgramDetector for ShellDetector {
    fn program_id(&self) -> &str {
        "shell"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn build_input_prompt_steps(&self, prompt: &str) -> Result<Vec<PromptStep>, DetectError> {
        require_prompt(prompt)?;
        Ok(vec![PromptStep::new(prompt, Duration::ZERO, Duration::from_millis(1_000))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codex_steps_match_spec_table() {
        let steps = CodexDetector.build_input_prompt_steps("hello").unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].input, "hello");
        assert_eq!(steps[0].timeout, Duration::from_millis(15_000));
        assert_eq!(steps[1].input, "\r");
        assert_eq!(steps[1].delay, Duration::from_millis(50));
        assert_eq!(steps[1].timeout, Duration::from_millis(1_000));
    }

    #[test]
    fn claude_steps_match_spec_table() {
        let steps = claude_detector().build_input_prompt_steps("hi").unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].input, "\n");
        assert_eq!(steps[1].delay, Duration::ZERO);
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let err = CodexDetector.build_input_prompt_steps("   ").unwrap_err();
        assert_eq!(err, DetectError::EmptyPrompt);
    }

    #[test]
    fn match_current_command_tolerates_wrappers() {
        assert!(CodexDetector.match_current_command("codex"));
        assert!(CodexDetector.match_current_command("sh -c codex"));
        assert!(CodexDetector.match_current_command("/usr/local/bin/codex"));
        assert!(CodexDetector.match_current_command("Codex (v1.2)"));
        assert!(!CodexDetector.match_current_command("claude"));
    }

    #[test]
    fn has_exited_mode_defaults_to_negated_match() {
        assert!(!CodexDetector.has_exited_mode("codex"));
        assert!(CodexDetector.has_exited_mode("vim"));
    }

    #[test]
    fn shell_is_always_available() {
        assert!(ShellDetector.is_available());
    }
}
