// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hermetic `PATH` lookup: no process spawn, so detector unit tests never
//! shell out. Any I/O error reading a `PATH` entry is swallowed — a
//! directory that vanished or isn't readable just doesn't contribute a hit.

use std::path::Path;

/// Whether `name` resolves to an existing, regular file under any `PATH`
/// entry.
pub fn on_path(name: &str) -> bool {
    let Ok(path_var) = std::env::var("PATH") else {
        return false;
    };
    std::env::split_paths(&path_var).any(|dir| candidate_exists(&dir, name))
}

fn candidate_exists(dir: &Path, name: &str) -> bool {
    match std::fs::metadata(dir.join(name)) {
        Ok(meta) => meta.is_file(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(path_env)]
    fn finds_binary_on_fake_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mytool"), b"#!/bin/sh\n").unwrap();
        let saved = std::env::var("PATH").ok();
        std::env::set_var("PATH", dir.path());

        assert!(on_path("mytool"));
        assert!(!on_path("nonexistent-tool-xyz"));

        match saved {
            Some(v) => std::env::set_var("PATH", v),
            None => std::env::remove_var("PATH"),
        }
    }
}
