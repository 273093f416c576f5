//! Snapshot file handling: the caller-side stand-in for persistence.
//!
//! The core store is purely in-memory; this module wraps each CLI command
//! in a load → mutate → save cycle against `.chantier/projects.json`,
//! discovered by walking up from the working directory.

use anyhow::{Context, Result};
use chantier_core::{ProjectStore, StoreState};
use std::path::{Path, PathBuf};

pub const DIR_NAME: &str = ".chantier";
pub const SNAPSHOT_FILE: &str = "projects.json";

/// Walk up from `start` looking for a `.chantier` directory.
#[must_use]
pub fn find_chantier_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Resolve the snapshot path or explain how to create one.
pub fn require_snapshot_path(start: &Path) -> Result<PathBuf> {
    let dir = find_chantier_dir(start)
        .with_context(|| "not a chantier workspace: .chantier directory not found (run `cht init`)")?;
    Ok(dir.join(SNAPSHOT_FILE))
}

/// Load the snapshot. A missing file is an empty state, matching the
/// "interaction before the load resolves" tolerance the projections have.
pub fn load_state(path: &Path) -> Result<StoreState> {
    if !path.exists() {
        return Ok(StoreState::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Write the snapshot atomically enough for a single-user CLI: temp file
/// in the same directory, then rename.
pub fn save_state(path: &Path, state: &StoreState) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("failed to serialize snapshot")?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

/// Load, hand a mutable store to `op`, and save back only when `op`
/// succeeded. The closure's error leaves the file untouched, mirroring
/// the store's unchanged-on-error guarantee.
pub fn with_store<T>(
    start: &Path,
    op: impl FnOnce(&mut ProjectStore) -> Result<T>,
) -> Result<T> {
    let path = require_snapshot_path(start)?;
    let mut store = ProjectStore::from_state(load_state(&path)?);
    let value = op(&mut store)?;
    save_state(&path, store.state())?;
    Ok(value)
}

/// Read-only variant of [`with_store`].
pub fn read_store(start: &Path) -> Result<ProjectStore> {
    let path = require_snapshot_path(start)?;
    Ok(ProjectStore::from_state(load_state(&path)?))
}

#[cfg(test)]
mod tests {
    use super::{find_chantier_dir, load_state, save_state, with_store, DIR_NAME, SNAPSHOT_FILE};
    use chantier_core::StoreState;
    use chantier_core::model::{NewProject, NewStage};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn discovery_walks_up() {
        let dir = tempfile::tempdir().expect("tempdir");
        let chantier = dir.path().join(DIR_NAME);
        std::fs::create_dir_all(&chantier).expect("mkdir");
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).expect("mkdir nested");

        assert_eq!(find_chantier_dir(&nested), Some(chantier));
    }

    #[test]
    fn missing_snapshot_is_empty_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SNAPSHOT_FILE);
        let state = load_state(&path).expect("load");
        assert_eq!(state, StoreState::default());
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SNAPSHOT_FILE);

        let mut state = StoreState::default();
        state.active_project_id = Some("PRJ-2026-aaaaaa".into());
        save_state(&path, &state).expect("save");

        let back = load_state(&path).expect("load");
        assert_eq!(back, state);
    }

    #[test]
    fn with_store_persists_successful_mutations() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join(DIR_NAME)).expect("mkdir");

        let id = with_store(dir.path(), |store| {
            Ok(store.add_project(NewProject {
                title: "Isolation combles".into(),
                description: String::new(),
                location: "Dijon".into(),
                start_date: date(2026, 9, 7),
                end_date: None,
                budget: 12_000,
                contractor: None,
                stages: Vec::<NewStage>::new(),
            }))
        })
        .expect("mutation");

        let store = super::read_store(dir.path()).expect("reload");
        assert!(store.state().project(&id).is_some());
    }

    #[test]
    fn with_store_failure_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join(DIR_NAME)).expect("mkdir");

        let path = dir.path().join(DIR_NAME).join(SNAPSHOT_FILE);
        save_state(&path, &StoreState::default()).expect("seed file");
        let before = std::fs::read_to_string(&path).expect("read");

        let result: anyhow::Result<()> = with_store(dir.path(), |store| {
            store.delete_project("PRJ-2026-zzzzzz")?;
            Ok(())
        });
        assert!(result.is_err());

        let after = std::fs::read_to_string(&path).expect("read");
        assert_eq!(before, after);
    }
}
