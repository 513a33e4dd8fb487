// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ProjectsStore` — the active-projects list at `active-projects.json`
//! (`spec.md` §3 `ActiveProject`, §4.E).

use std::path::{Path, PathBuf};

use pw_core::{ActiveProject, Clock, ProjectId, SystemClock};

use crate::error::ConfigError;
use crate::paths::atomic_write;

pub struct ProjectsStore<C: Clock = SystemClock> {
    dir: PathBuf,
    clock: C,
}

impl ProjectsStore<SystemClock> {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, SystemClock)
    }
}

impl<C: Clock> ProjectsStore<C> {
    pub fn with_clock(dir: impl Into<PathBuf>, clock: C) -> Self {
        Self { dir: dir.into(), clock }
    }

    fn path(&self) -> PathBuf {
        self.dir.join("active-projects.json")
    }

    pub fn load(&self) -> Result<Vec<ActiveProject>, ConfigError> {
        match std::fs::read_to_string(self.path()) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&self, projects: &[ActiveProject]) -> Result<(), ConfigError> {
        let contents = serde_json::to_vec_pretty(projects)?;
        atomic_write(&self.path(), &contents)
    }

    /// Dedupes by `project_id`: an existing row has its `repo_root`,
    /// `display_name` (only if supplied) and `updated_at` refreshed;
    /// otherwise a new row is appended. Blank display names fall back to
    /// `project_id`.
    pub fn add_project(
        &self,
        project_id: ProjectId,
        repo_root: impl Into<String>,
        display_name: Option<String>,
    ) -> Result<Vec<ActiveProject>, ConfigError> {
        let mut projects = self.load()?;
        let repo_root = repo_root.into();
        let updated_at = self.clock.epoch_secs();

        match projects.iter_mut().find(|p| p.project_id == project_id) {
            Some(existing) => {
                existing.repo_root = repo_root;
                if let Some(name) = display_name {
                    existing.display_name = name;
                }
                if existing.display_name.trim().is_empty() {
                    existing.display_name = existing.project_id.to_string();
                }
                existing.updated_at = updated_at;
            }
            None => {
                let display_name = display_name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| project_id.to_string());
                projects.push(ActiveProject { project_id, repo_root, display_name, updated_at });
            }
        }

        self.save(&projects)?;
        Ok(projects)
    }

    pub fn remove_project(&self, project_id: &ProjectId) -> Result<Vec<ActiveProject>, ConfigError> {
        let mut projects = self.load()?;
        projects.retain(|p| &p.project_id != project_id);
        self.save(&projects)?;
        Ok(projects)
    }

    /// Updates `display_name` (and `updated_at`) if `project_id` is
    /// present; otherwise a no-op save (the file is rewritten unchanged).
    pub fn set_project_display_name(
        &self,
        project_id: &ProjectId,
        display_name: impl Into<String>,
    ) -> Result<Vec<ActiveProject>, ConfigError> {
        let mut projects = self.load()?;
        let display_name = display_name.into();

        if let Some(existing) = projects.iter_mut().find(|p| &p.project_id == project_id) {
            existing.display_name =
                if display_name.trim().is_empty() { existing.project_id.to_string() } else { display_name };
            existing.updated_at = self.clock.epoch_secs();
        }

        self.save(&projects)?;
        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pw_core::FakeClock;

    fn store(dir: &Path) -> ProjectsStore<FakeClock> {
        ProjectsStore::with_clock(dir, FakeClock::new())
    }

    #[test]
    fn add_project_dedupes_by_id_and_refreshes_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let id = ProjectId::from("proj-1");

        store.add_project(id.clone(), "/repo/a", Some("A".to_string())).unwrap();
        let projects = store.add_project(id.clone(), "/repo/a-renamed", None).unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].repo_root, "/repo/a-renamed");
        assert_eq!(projects[0].display_name, "A");
    }

    #[test]
    fn add_project_blank_display_name_falls_back_to_project_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let id = ProjectId::from("proj-2");

        let projects = store.add_project(id.clone(), "/repo/b", Some("   ".to_string())).unwrap();
        assert_eq!(projects[0].display_name, id.to_string());
    }

    #[test]
    fn remove_project_filters_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let id = ProjectId::from("proj-3");
        store.add_project(id.clone(), "/repo/c", None).unwrap();

        let projects = store.remove_project(&id).unwrap();
        assert!(projects.is_empty());
    }

    #[test]
    fn set_project_display_name_is_a_noop_save_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let missing = ProjectId::from("does-not-exist");

        let projects = store.set_project_display_name(&missing, "whatever").unwrap();
        assert!(projects.is_empty());
        assert!(dir.path().join("active-projects.json").is_file());
    }
}
