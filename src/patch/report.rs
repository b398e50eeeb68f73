//! Console rendering of a [`PatchReport`].

use super::PatchReport;

const ADDED: &str = "✅";
const SKIPPED: &str = "⚠️ ";

/// Render the report as the status lines printed after a run.
///
/// Example output:
/// ```text
/// Generated IDs:
///   Plugin.swift file ref: 4F1C...
///   Plugin.swift build file: 9A03...
/// ✅ Added to PBXBuildFile section
/// ⚠️  Runner group not found, skipped
/// ```
pub fn render_text(report: &PatchReport) -> String {
    let name = &report.file.name;
    let mut output = String::new();

    output.push_str("Generated IDs:\n");
    output.push_str(&format!("  {} file ref: {}\n", name, report.ids.file_ref));
    output.push_str(&format!("  {} build file: {}\n", name, report.ids.build_file));

    for step in &report.steps {
        let line = match step.matches {
            0 => format!("{} {} not found, skipped", SKIPPED, step.site),
            1 => format!("{} Added to {}", ADDED, step.site),
            n => format!("{} Added to {} ({} places)", SKIPPED, step.site, n),
        };
        output.push_str(&line);
        output.push('\n');
    }

    output.push('\n');
    if report.written {
        output.push_str(&format!("{} Successfully added {} to Xcode project!\n", ADDED, name));
        if let Some(backup) = &report.backup {
            output.push_str(&format!("Original saved to {}\n", backup.display()));
        }
        output.push_str("\nNext steps:\n");
        output.push_str("1. Rebuild the project to confirm the manifest still loads\n");
        output.push_str("2. Do not run this again for the same file: entries would be duplicated\n");
    } else {
        output.push_str(&format!(
            "Dry run: {} -> {} lines, manifest not written\n",
            report.lines_before, report.lines_after
        ));
    }

    output
}

/// Render the report as pretty-printed JSON.
pub fn render_json(report: &PatchReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
