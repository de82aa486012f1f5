use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::model::Draft;

// ── Error type ──────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ProjectError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectError::Io(e) => write!(f, "I/O error: {e}"),
            ProjectError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ProjectError {}

impl From<std::io::Error> for ProjectError {
    fn from(e: std::io::Error) -> Self {
        ProjectError::Io(e)
    }
}

impl From<serde_json::Error> for ProjectError {
    fn from(e: serde_json::Error) -> Self {
        ProjectError::Json(e)
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Write `data` to `path` without leaving a half-written file behind.
///
/// The bytes go to `<name>.tmp` first and are synced; the previous file, if
/// any, is kept as `<name>.bak`.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<(), ProjectError> {
    let tmp_path = sibling(path, ".tmp");

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    if path.exists() {
        let _ = fs::rename(path, sibling(path, ".bak"));
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// `draft.json` + `.tmp` → `draft.json.tmp`, in the same directory.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ProjectError> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ProjectError> {
    let data = fs::read_to_string(path)?;
    let value = serde_json::from_str(&data)?;
    Ok(value)
}

// ── Draft files ─────────────────────────────────────────────────────

/// Load a draft file. A missing file is an empty draft.
pub fn load_draft(path: &Path) -> Result<Draft, ProjectError> {
    if !path.exists() {
        return Ok(Draft::new());
    }
    read_json(path)
}

/// Save a draft, creating parent directories as needed.
pub fn save_draft(path: &Path, draft: &Draft) -> Result<(), ProjectError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_json(path, draft)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::model::ChainStep;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn draft_save_then_load_round_trip() {
        let dir = scratch("cmdcraft_test_draft_round_trip");
        let path = dir.join("nested").join("draft.json");

        let mut draft = Draft::new();
        draft.chain.add(ChainStep::new("as").with("target", "@a"));
        draft.chain.add(ChainStep::new("positioned").with("y", "~2"));
        draft.run_command = "say hi".into();

        save_draft(&path, &draft).unwrap();
        let loaded = load_draft(&path).unwrap();
        assert_eq!(loaded, draft);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_draft_is_empty() {
        let dir = scratch("cmdcraft_test_missing_draft");
        let loaded = load_draft(&dir.join("draft.json")).unwrap();
        assert!(loaded.chain.is_empty());
        assert!(loaded.run_command.is_empty());
    }

    #[test]
    fn atomic_write_keeps_a_backup() {
        let dir = scratch("cmdcraft_test_atomic_write");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("file.txt");

        atomic_write(&path, b"one").unwrap();
        atomic_write(&path, b"two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
        assert_eq!(fs::read_to_string(dir.join("file.txt.bak")).unwrap(), "one");
        assert!(!dir.join("file.txt.tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_draft_is_a_json_error() {
        let dir = scratch("cmdcraft_test_bad_draft");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("draft.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_draft(&path), Err(ProjectError::Json(_))));
        let _ = fs::remove_dir_all(&dir);
    }
}
