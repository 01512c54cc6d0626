//! Deleting files and folders reported by a scan.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of removing one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RemoveOutcome {
    /// The path is gone.
    Removed { path: PathBuf, freed_bytes: u64 },
    /// Nothing (or only part of a folder) was removed.
    Failed { path: PathBuf, error: String },
}

impl RemoveOutcome {
    pub fn path(&self) -> &Path {
        match self {
            RemoveOutcome::Removed { path, .. } | RemoveOutcome::Failed { path, .. } => path,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RemoveOutcome::Removed { .. })
    }
}

/// Delete a file or a whole folder.
///
/// Symbolic links are removed themselves, never their targets.
pub fn remove_path(path: &Path) -> RemoveOutcome {
    let failed = |error: std::io::Error| RemoveOutcome::Failed {
        path: path.to_path_buf(),
        error: error.to_string(),
    };

    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) => return failed(e),
    };

    let (freed_bytes, removal) = if metadata.is_dir() {
        (dir_size(path), fs::remove_dir_all(path))
    } else {
        (metadata.len(), fs::remove_file(path))
    };

    match removal {
        Ok(()) => {
            tracing::info!(path = %path.display(), freed_bytes, "Removed");
            RemoveOutcome::Removed {
                path: path.to_path_buf(),
                freed_bytes,
            }
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Removal failed");
            failed(e)
        }
    }
}

fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_remove_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.iso");
        File::create(&path).unwrap().write_all(&[0u8; 2048]).unwrap();

        let outcome = remove_path(&path);
        assert_eq!(
            outcome,
            RemoveOutcome::Removed {
                path: path.clone(),
                freed_bytes: 2048
            }
        );
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_folder_reports_freed() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("cache");
        fs::create_dir_all(folder.join("nested")).unwrap();
        File::create(folder.join("a")).unwrap().write_all(&[1u8; 100]).unwrap();
        File::create(folder.join("nested/b")).unwrap().write_all(&[1u8; 50]).unwrap();

        let outcome = remove_path(&folder);
        assert!(outcome.is_success());
        assert!(matches!(outcome, RemoveOutcome::Removed { freed_bytes: 150, .. }));
        assert!(!folder.exists());
    }

    #[test]
    fn test_remove_missing_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ghost");

        let outcome = remove_path(&path);
        assert!(!outcome.is_success());
        assert_eq!(outcome.path(), path.as_path());
    }

    #[test]
    fn test_remove_symlink_keeps_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        File::create(target.join("keep")).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(remove_path(&link).is_success());
        assert!(target.join("keep").exists());
        assert!(fs::symlink_metadata(&link).is_err());
    }
}
