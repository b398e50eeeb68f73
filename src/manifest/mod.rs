//! Reading and writing the manifest file.

mod sections;

use std::path::{Path, PathBuf};

use crate::error::{PatchError, Result};

pub use sections::{scan_sections, Section};

/// Manifest path used when none is given.
pub const DEFAULT_PATH: &str = "macos/Runner.xcodeproj/project.pbxproj";

/// A `project.pbxproj` file on disk.
///
/// The file is read in full and written in full. There is no locking and no
/// atomic rename; an external edit between [`read`](Self::read) and
/// [`write`](Self::write) is lost.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
}

impl ManifestFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<String> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| PatchError::Read {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "read manifest");
        Ok(text)
    }

    /// Overwrite the file with `text`.
    pub fn write(&self, text: &str) -> Result<()> {
        std::fs::write(&self.path, text).map_err(|source| PatchError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), bytes = text.len(), "wrote manifest");
        Ok(())
    }

    /// Path of the backup copy: the manifest path with `.bak` appended.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Copy the current file to [`backup_path`](Self::backup_path), replacing
    /// any earlier backup.
    pub fn backup(&self) -> Result<PathBuf> {
        let backup = self.backup_path();
        std::fs::copy(&self.path, &backup).map_err(|source| PatchError::Backup {
            path: backup.clone(),
            source,
        })?;
        tracing::info!(path = %backup.display(), "backed up manifest");
        Ok(backup)
    }
}

impl Default for ManifestFile {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path_appends_suffix() {
        let manifest = ManifestFile::new("macos/Runner.xcodeproj/project.pbxproj");
        assert_eq!(
            manifest.backup_path(),
            PathBuf::from("macos/Runner.xcodeproj/project.pbxproj.bak")
        );
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = ManifestFile::new(dir.path().join("missing.pbxproj"));

        let err = manifest.read().unwrap_err();
        assert!(matches!(err, PatchError::Read { .. }));
        assert!(err.to_string().contains("missing.pbxproj"));
    }

    #[test]
    fn test_write_then_backup() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = ManifestFile::new(dir.path().join("project.pbxproj"));

        manifest.write("first\n").unwrap();
        let backup = manifest.backup().unwrap();
        manifest.write("second\n").unwrap();

        assert_eq!(std::fs::read_to_string(backup).unwrap(), "first\n");
        assert_eq!(manifest.read().unwrap(), "second\n");
    }
}
