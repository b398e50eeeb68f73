use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PatchError>;

/// Errors raised while loading, patching or saving a manifest.
///
/// An insertion site that cannot be found is not an error; see
/// [`crate::patch::StepOutcome`].
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to back up manifest to {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid identifier {0:?}: expected 24 uppercase hex digits")]
    InvalidIdentifier(String),

    #[error("invalid file name {0:?}")]
    InvalidFileName(String),

    #[error("invalid file type {0:?}")]
    InvalidFileType(String),

    #[error("bad insertion pattern: {0}")]
    Pattern(#[from] regex::Error),
}
