// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `AppProgramsStore` — always the built-in helper-program list
//! (`spec.md` §4.E, §6: `app-programs.*` is never written).

use pw_core::HelperProgram;

pub const BUILTIN_APP_PROGRAMS: [HelperProgram; 3] =
    [HelperProgram::Codex, HelperProgram::Claude, HelperProgram::Cursor];

pub struct AppProgramsStore;

impl AppProgramsStore {
    /// Disk content under `_dir` is ignored; always returns the built-in
    /// list.
    pub fn load_or_init(_dir: &std::path::Path) -> Vec<HelperProgram> {
        BUILTIN_APP_PROGRAMS.to_vec()
    }

    /// No-op: this file format is explicitly never created.
    pub fn save(_dir: &std::path::Path, _programs: &[HelperProgram]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_or_init_ignores_disk_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app-programs.toml"), "garbage").unwrap();

        let programs = AppProgramsStore::load_or_init(dir.path());
        assert_eq!(programs, BUILTIN_APP_PROGRAMS.to_vec());
    }

    #[test]
    fn save_never_creates_a_file() {
        let dir = tempfile::tempdir().unwrap();
        AppProgramsStore::save(dir.path(), &BUILTIN_APP_PROGRAMS);
        assert!(!dir.path().join("app-programs.toml").exists());
    }
}
