//! Registering a source file in a manifest.
//!
//! [`Patcher`] threads the manifest text through the four steps in
//! [`steps`] and collects a [`PatchReport`]. [`Patcher::patch_file`] adds the
//! read and the unconditional write-back around it.

mod report;
pub mod steps;

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::manifest::{self, ManifestFile};
use crate::models::{GeneratedIds, PatchTarget, SourceFile};

pub use report::{render_json, render_text};
pub use steps::{Step, StepOutcome};

/// Options for [`Patcher::patch_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Run every step but leave the file untouched.
    pub dry_run: bool,
    /// Copy the original to `<path>.bak` before overwriting it.
    pub backup: bool,
}

/// Record counts in the two sections that receive new records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub build_files: usize,
    pub file_references: usize,
}

impl RecordCounts {
    fn of(text: &str) -> Self {
        let mut counts = Self::default();
        for section in manifest::scan_sections(text) {
            match section.name.as_str() {
                "PBXBuildFile" => counts.build_files += section.records,
                "PBXFileReference" => counts.file_references += section.records,
                _ => {}
            }
        }
        counts
    }
}

/// Everything a run did, for the console or `--format json`.
#[derive(Debug, Clone, Serialize)]
pub struct PatchReport {
    pub file: SourceFile,
    pub ids: GeneratedIds,
    pub steps: Vec<StepOutcome>,
    pub lines_before: usize,
    pub lines_after: usize,
    pub records_before: RecordCounts,
    pub records_after: RecordCounts,
    pub manifest: Option<PathBuf>,
    pub backup: Option<PathBuf>,
    pub written: bool,
}

impl PatchReport {
    /// Whether every step found its insertion site.
    pub fn complete(&self) -> bool {
        self.steps.iter().all(StepOutcome::applied)
    }
}

/// Patched text plus the report describing it.
#[derive(Debug, Clone)]
pub struct Patched {
    pub text: String,
    pub report: PatchReport,
}

/// Registers one source file with freshly generated identifiers.
#[derive(Debug, Clone)]
pub struct Patcher {
    file: SourceFile,
    target: PatchTarget,
    ids: GeneratedIds,
}

impl Patcher {
    pub fn new(file: SourceFile, target: PatchTarget) -> Self {
        Self::with_ids(file, target, GeneratedIds::generate())
    }

    /// Use fixed identifiers instead of generating them.
    pub fn with_ids(file: SourceFile, target: PatchTarget, ids: GeneratedIds) -> Self {
        Self { file, target, ids }
    }

    pub fn ids(&self) -> &GeneratedIds {
        &self.ids
    }

    pub fn file(&self) -> &SourceFile {
        &self.file
    }

    /// Run the four steps in order over `text`.
    ///
    /// A step that finds nothing leaves the text as it was and the next step
    /// runs anyway.
    pub fn apply(&self, text: &str) -> Result<Patched> {
        let (file, ids, target) = (&self.file, &self.ids, &self.target);

        let (text_1, build_file) = steps::register_build_file(text, file, ids)?;
        let (text_2, file_reference) = steps::register_file_reference(&text_1, file, ids)?;
        let (text_3, group_child) = steps::register_group_child(&text_2, file, ids, target)?;
        let (patched, build_phase) = steps::register_build_phase(&text_3, file, ids, target)?;

        let steps = vec![build_file, file_reference, group_child, build_phase];
        for outcome in &steps {
            match outcome.matches {
                0 => tracing::warn!(step = outcome.step.as_str(), "{} not found", outcome.site),
                1 => tracing::debug!(step = outcome.step.as_str(), "patched {}", outcome.site),
                n => tracing::warn!(
                    step = outcome.step.as_str(),
                    matches = n,
                    "{} matched more than once",
                    outcome.site
                ),
            }
        }

        let report = PatchReport {
            file: self.file.clone(),
            ids: self.ids.clone(),
            steps,
            lines_before: text.lines().count(),
            lines_after: patched.lines().count(),
            records_before: RecordCounts::of(text),
            records_after: RecordCounts::of(&patched),
            manifest: None,
            backup: None,
            written: false,
        };
        Ok(Patched {
            text: patched,
            report,
        })
    }

    /// Read `manifest`, patch it and write the result back to the same path.
    ///
    /// The file is overwritten even when no step matched.
    pub fn patch_file(&self, manifest: &ManifestFile, options: WriteOptions) -> Result<PatchReport> {
        let text = manifest.read()?;
        let Patched { text, mut report } = self.apply(&text)?;
        report.manifest = Some(manifest.path().to_path_buf());

        if options.dry_run {
            tracing::info!(path = %manifest.path().display(), "dry run, manifest not written");
            return Ok(report);
        }

        if options.backup {
            report.backup = Some(manifest.backup()?);
        }
        manifest.write(&text)?;
        report.written = true;

        Ok(report)
    }
}
