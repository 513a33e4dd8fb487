//! `ConfigStore.Save ∘ LoadOrInit` converges after one normalization pass
//! (`spec.md` §8): writing back a config that was already normalized, then
//! reading it again, must yield byte-for-byte the same normalized value.

use pw_config::ConfigStore;
use pw_core::{HelperProgram, SessionProgram, DEFAULT_LOCAL_PORT};

#[test]
fn save_then_load_or_init_is_a_fixed_point() {
    let dir = tempfile::tempdir().unwrap();

    let first = ConfigStore::load_or_init(dir.path()).unwrap();
    ConfigStore::save(dir.path(), &first).unwrap();
    let second = ConfigStore::load_or_init(dir.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(second.local_port, DEFAULT_LOCAL_PORT);
    assert_eq!(second.defaults.session_program, SessionProgram::Shell);
    assert_eq!(second.defaults.helper_program, HelperProgram::Codex);
}

#[test]
fn normalization_is_idempotent_across_repeated_save_load_cycles() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "local_port = 0\ndefault_launch_program = \"claude\"\n",
    )
    .unwrap();

    let mut config = ConfigStore::load_or_init(dir.path()).unwrap();
    assert_eq!(config.defaults.session_program, SessionProgram::Claude);

    for _ in 0..3 {
        ConfigStore::save(dir.path(), &config).unwrap();
        config = ConfigStore::load_or_init(dir.path()).unwrap();
        assert_eq!(config.defaults.session_program, SessionProgram::Claude);
        assert_eq!(config.local_port, DEFAULT_LOCAL_PORT);
    }
}
