//! Program detectors register with unique ids; registration order is
//! observable via `List()` (`spec.md` §8).

use std::sync::Arc;

use pw_detect::{DetectError, ProgramDetector, ProgramRegistry, PromptStep};

#[derive(Debug)]
struct StubDetector(&'static str);

impl ProgramDetector for StubDetector {
    fn program_id(&self) -> &str {
        self.0
    }

    fn build_input_prompt_steps(&self, _prompt: &str) -> Result<Vec<PromptStep>, DetectError> {
        Ok(Vec::new())
    }
}

#[test]
fn duplicate_program_id_is_rejected_without_disturbing_existing_order() {
    let registry = ProgramRegistry::new();
    registry.register(Arc::new(StubDetector("alpha"))).unwrap();
    registry.register(Arc::new(StubDetector("beta"))).unwrap();

    let err = registry.register(Arc::new(StubDetector("alpha"))).unwrap_err();
    assert!(matches!(err, DetectError::DuplicateProgramId(id) if id == "alpha"));

    let ids: Vec<&str> = registry.list().iter().map(|d| d.program_id()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["alpha", "beta"]);
}

#[test]
fn process_registry_exposes_built_ins_in_a_stable_registration_order() {
    let ids: Vec<String> =
        pw_detect::process_registry().list().iter().map(|d| d.program_id().to_string()).collect();

    assert_eq!(ids, vec!["codex", "claude", "cursor", "antigravity", "shell"]);
}
