//! Register a source file in an Xcode `project.pbxproj` manifest.
//!
//! The manifest is edited as text: four regular-expression insertions add a
//! build-file record, a file-reference record, a group child and a build-phase
//! entry. See [`patch::Patcher`] for the entry point.

pub mod error;
pub mod manifest;
pub mod models;
pub mod patch;

pub use error::{PatchError, Result};
