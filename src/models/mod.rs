//! Domain types for manifest patching.
//!
//! # Core Concepts
//!
//! - [`Identifier`]: 24-digit uppercase hex key used by every record in a
//!   `project.pbxproj` file. Two fresh ones are generated per run.
//! - [`SourceFile`]: the file being registered, with its detected [`FileKind`].
//! - [`RecordRef`]: an existing record (id plus comment label) that anchors an
//!   insertion inside a list.
//! - [`PatchTarget`]: the group and build phase that receive the new file.

mod identifier;
mod source_file;
mod target;

pub use identifier::*;
pub use source_file::*;
pub use target::*;
