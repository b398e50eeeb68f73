//! The four insertions that register a source file.
//!
//! Each step takes the manifest text by reference and returns the edited text
//! with a [`StepOutcome`]. A step whose site is missing returns the text
//! unchanged with zero matches. Every occurrence of a site is edited, so a
//! manifest that already holds the file gets a second copy.

use regex::{Captures, Regex};
use serde::Serialize;

use crate::error::Result;
use crate::models::{GeneratedIds, PatchTarget, RecordRef, SourceFile};

const BUILD_FILE_SECTION: &str = "PBXBuildFile";
const FILE_REFERENCE_SECTION: &str = "PBXFileReference";

/// One of the four insertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    BuildFile,
    FileReference,
    GroupChild,
    BuildPhase,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuildFile => "build_file",
            Self::FileReference => "file_reference",
            Self::GroupChild => "group_child",
            Self::BuildPhase => "build_phase",
        }
    }
}

/// Result of running one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: Step,
    /// Human name of the insertion site, e.g. `PBXBuildFile section`.
    pub site: String,
    /// Number of places the new line was inserted.
    pub matches: usize,
}

impl StepOutcome {
    pub fn applied(&self) -> bool {
        self.matches > 0
    }
}

/// Add `<build> /* <name> in Sources */ = {isa = PBXBuildFile; ...}` to the
/// end of the `PBXBuildFile` section.
pub fn register_build_file(
    text: &str,
    file: &SourceFile,
    ids: &GeneratedIds,
) -> Result<(String, StepOutcome)> {
    let record = format!(
        "{build} /* {name} in Sources */ = {{isa = PBXBuildFile; fileRef = {file_ref} /* {name} */; }};",
        build = ids.build_file,
        file_ref = ids.file_ref,
        name = file.name,
    );
    let (text, matches) = append_to_section(text, BUILD_FILE_SECTION, &record)?;
    Ok((
        text,
        StepOutcome {
            step: Step::BuildFile,
            site: format!("{BUILD_FILE_SECTION} section"),
            matches,
        },
    ))
}

/// Add the `PBXFileReference` record describing the file to the end of its
/// section.
pub fn register_file_reference(
    text: &str,
    file: &SourceFile,
    ids: &GeneratedIds,
) -> Result<(String, StepOutcome)> {
    let record = format!(
        "{file_ref} /* {name} */ = {{isa = PBXFileReference; lastKnownFileType = {kind}; path = {path}; sourceTree = \"<group>\"; }};",
        file_ref = ids.file_ref,
        kind = file.kind_value(),
        path = file.path_value(),
        name = file.name,
    );
    let (text, matches) = append_to_section(text, FILE_REFERENCE_SECTION, &record)?;
    Ok((
        text,
        StepOutcome {
            step: Step::FileReference,
            site: format!("{FILE_REFERENCE_SECTION} section"),
            matches,
        },
    ))
}

/// List the new file reference in the target group's `children`, directly
/// before the group anchor.
pub fn register_group_child(
    text: &str,
    file: &SourceFile,
    ids: &GeneratedIds,
    target: &PatchTarget,
) -> Result<(String, StepOutcome)> {
    let entry = format!("{} /* {} */", ids.file_ref, file.name);
    let (text, matches) =
        insert_into_list(text, &target.group, "children", &target.group_anchor, &entry)?;
    Ok((
        text,
        StepOutcome {
            step: Step::GroupChild,
            site: format!("{} group", target.group.label),
            matches,
        },
    ))
}

/// List the new build file in the target build phase's `files`, directly
/// before the phase anchor.
pub fn register_build_phase(
    text: &str,
    file: &SourceFile,
    ids: &GeneratedIds,
    target: &PatchTarget,
) -> Result<(String, StepOutcome)> {
    let entry = format!("{} /* {} in Sources */", ids.build_file, file.name);
    let (text, matches) =
        insert_into_list(text, &target.phase, "files", &target.phase_anchor, &entry)?;
    Ok((
        text,
        StepOutcome {
            step: Step::BuildPhase,
            site: format!("{} build phase", target.phase.label),
            matches,
        },
    ))
}

/// Insert `record` on its own line before `/* End <section> section */`.
///
/// Nothing happens unless a whole `Begin`/`End` region for `section` exists;
/// once it does, every end marker gets the record. The record is indented two
/// tabs deeper than an end marker that starts its line (column zero in files
/// Xcode writes) and two tabs deep when the marker follows other text.
fn append_to_section(text: &str, section: &str, record: &str) -> Result<(String, usize)> {
    let begin = format!("/* Begin {section} section */");
    let marker = format!("/* End {section} section */");

    let region = Regex::new(&format!(
        r"(?s){}.*?{}",
        regex::escape(&begin),
        regex::escape(&marker)
    ))?;
    if !region.is_match(text) {
        return Ok((text.to_string(), 0));
    }

    let re = Regex::new(&format!(r"(?m)(^[ \t]*)?{}", regex::escape(&marker)))?;

    let mut matches = 0;
    let patched = re.replace_all(text, |caps: &Captures| {
        matches += 1;
        let indent = caps.get(1).map_or("", |m| m.as_str());
        format!("{indent}\t\t{record}\n{indent}{marker}")
    });
    Ok((patched.into_owned(), matches))
}

/// Insert `<entry>,` before `anchor` inside the `list` field of `owner`.
///
/// The owner record is matched from its header up to the anchor without
/// crossing a `}` (end of the record) or a `)` (end of the list). The new line
/// copies the anchor's indentation.
fn insert_into_list(
    text: &str,
    owner: &RecordRef,
    list: &str,
    anchor: &RecordRef,
    entry: &str,
) -> Result<(String, usize)> {
    let pattern = format!(
        r"({owner_id} /\* {owner_label} \*/ = \{{[^}}]+{list} = \([^)]+)({anchor_id} /\* {anchor_label} \*/,)",
        owner_id = owner.id,
        owner_label = regex::escape(&owner.label),
        list = regex::escape(list),
        anchor_id = anchor.id,
        anchor_label = regex::escape(&anchor.label),
    );
    let re = Regex::new(&pattern)?;

    let mut matches = 0;
    let patched = re.replace_all(text, |caps: &Captures| {
        matches += 1;
        let head = &caps[1];
        let indent = line_indent(head);
        format!("{head}{entry},\n{indent}{}", &caps[2])
    });
    Ok((patched.into_owned(), matches))
}

/// Trailing blanks after the last newline of `head`: the indentation of
/// whatever comes next on that line.
fn line_indent(head: &str) -> &str {
    let line_start = head.rfind('\n').map_or(0, |i| i + 1);
    let tail = &head[line_start..];
    let blanks = tail.len() - tail.trim_start_matches([' ', '\t']).len();
    &tail[..blanks]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identifier;

    fn ids() -> GeneratedIds {
        GeneratedIds {
            file_ref: "AAAAAAAAAAAAAAAAAAAAAAAA".parse().unwrap(),
            build_file: "BBBBBBBBBBBBBBBBBBBBBBBB".parse().unwrap(),
        }
    }

    fn swift_file() -> SourceFile {
        SourceFile::new("Plugin.swift", None).unwrap()
    }

    #[test]
    fn test_line_indent() {
        assert_eq!(line_indent("children = (\n\t\t\t\t"), "\t\t\t\t");
        assert_eq!(line_indent("a,\n  "), "  ");
        assert_eq!(line_indent("no newline"), "");
    }

    #[test]
    fn test_build_file_goes_before_end_marker() {
        let text = "/* Begin PBXBuildFile section */\n/* End PBXBuildFile section */\n";
        let (out, outcome) = register_build_file(text, &swift_file(), &ids()).unwrap();

        assert_eq!(outcome.matches, 1);
        assert_eq!(
            out,
            "/* Begin PBXBuildFile section */\n\
             \t\tBBBBBBBBBBBBBBBBBBBBBBBB /* Plugin.swift in Sources */ = {isa = PBXBuildFile; fileRef = AAAAAAAAAAAAAAAAAAAAAAAA /* Plugin.swift */; };\n\
             /* End PBXBuildFile section */\n"
        );
    }

    #[test]
    fn test_file_reference_uses_detected_kind() {
        let text = "/* Begin PBXFileReference section */\n/* End PBXFileReference section */\n";
        let file = SourceFile::new("Bridge.m", None).unwrap();
        let (out, _) = register_file_reference(text, &file, &ids()).unwrap();
        assert!(out.contains("lastKnownFileType = sourcecode.c.objc; path = Bridge.m;"));
    }

    #[test]
    fn test_end_marker_in_the_middle_of_a_line() {
        let text = "/* Begin PBXBuildFile section */ X = {isa = PBXBuildFile; }; /* End PBXBuildFile section */\n";
        let (out, outcome) = register_build_file(text, &swift_file(), &ids()).unwrap();

        assert_eq!(outcome.matches, 1);
        assert!(out.starts_with(
            "/* Begin PBXBuildFile section */ X = {isa = PBXBuildFile; }; \t\tBBBBBBBBBBBBBBBBBBBBBBBB /* Plugin.swift in Sources */"
        ));
        assert!(out.ends_with("; };\n/* End PBXBuildFile section */\n"));
    }

    #[test]
    fn test_end_marker_without_begin_is_ignored() {
        let text = "\t\tX = {isa = PBXBuildFile; };\n/* End PBXBuildFile section */\n";
        let (out, outcome) = register_build_file(text, &swift_file(), &ids()).unwrap();
        assert_eq!(out, text);
        assert_eq!(outcome.matches, 0);
    }

    #[test]
    fn test_end_marker_before_begin_is_ignored() {
        let text = "/* End PBXFileReference section */\n/* Begin PBXFileReference section */\n";
        let (out, outcome) = register_file_reference(text, &swift_file(), &ids()).unwrap();
        assert_eq!(out, text);
        assert!(!outcome.applied());
    }

    #[test]
    fn test_file_reference_quotes_path_when_needed() {
        let text = "/* Begin PBXFileReference section */\n/* End PBXFileReference section */\n";

        let spaced = SourceFile::new("My Plugin.swift", None).unwrap();
        let (out, _) = register_file_reference(text, &spaced, &ids()).unwrap();
        assert!(out.contains(
            "AAAAAAAAAAAAAAAAAAAAAAAA /* My Plugin.swift */ = {isa = PBXFileReference; lastKnownFileType = sourcecode.swift; path = \"My Plugin.swift\"; sourceTree"
        ));

        let category = SourceFile::new("NSString+Util.m", None).unwrap();
        let (out, _) = register_file_reference(text, &category, &ids()).unwrap();
        assert!(out.contains("path = \"NSString+Util.m\";"));
    }

    #[test]
    fn test_missing_marker_leaves_text_alone() {
        let text = "// !$*UTF8*$!\n{\n}\n";
        let (out, outcome) = register_file_reference(text, &swift_file(), &ids()).unwrap();
        assert_eq!(out, text);
        assert!(!outcome.applied());
    }

    #[test]
    fn test_group_child_copies_anchor_indent() {
        let text = "\t\t33CC10EF2044A3C60003C045 /* Runner */ = {\n\
                    \t\t\tisa = PBXGroup;\n\
                    \t\t\tchildren = (\n\
                    \t\t\t\t33CC10F02044A3C60003C045 /* AppDelegate.swift */,\n\
                    \t\t\t);\n\
                    \t\t};\n";
        let target = PatchTarget::default();
        let (out, outcome) = register_group_child(text, &swift_file(), &ids(), &target).unwrap();

        assert_eq!(outcome.matches, 1);
        assert_eq!(outcome.site, "Runner group");
        assert!(out.contains(
            "\t\t\tchildren = (\n\
             \t\t\t\tAAAAAAAAAAAAAAAAAAAAAAAA /* Plugin.swift */,\n\
             \t\t\t\t33CC10F02044A3C60003C045 /* AppDelegate.swift */,\n"
        ));
    }

    #[test]
    fn test_group_anchor_outside_list_does_not_match() {
        // The anchor only appears after the children list is closed.
        let text = "33CC10EF2044A3C60003C045 /* Runner */ = {\n\
                    children = (\n\
                    );\n\
                    33CC10F02044A3C60003C045 /* AppDelegate.swift */,\n";
        let target = PatchTarget::default();
        let (out, outcome) = register_group_child(text, &swift_file(), &ids(), &target).unwrap();
        assert_eq!(out, text);
        assert_eq!(outcome.matches, 0);
    }

    #[test]
    fn test_build_phase_with_custom_target() {
        let phase_id: Identifier = "111111111111111111111111".parse().unwrap();
        let anchor_id: Identifier = "222222222222222222222222".parse().unwrap();
        let target = PatchTarget {
            phase: RecordRef::new(phase_id, "Sources"),
            phase_anchor: RecordRef::new(anchor_id, "main.m in Sources"),
            ..PatchTarget::default()
        };
        let text = "111111111111111111111111 /* Sources */ = {\n\
                    \tisa = PBXSourcesBuildPhase;\n\
                    \tfiles = (\n\
                    \t\t222222222222222222222222 /* main.m in Sources */,\n\
                    \t);\n\
                    };\n";
        let (out, outcome) = register_build_phase(text, &swift_file(), &ids(), &target).unwrap();

        assert_eq!(outcome.site, "Sources build phase");
        assert!(out.contains(
            "\t\tBBBBBBBBBBBBBBBBBBBBBBBB /* Plugin.swift in Sources */,\n\
             \t\t222222222222222222222222 /* main.m in Sources */,"
        ));
    }

    #[test]
    fn test_file_name_is_not_treated_as_replacement_syntax() {
        let text = "/* Begin PBXFileReference section */\n/* End PBXFileReference section */\n";
        let file = SourceFile::new("$1Plugin.swift", None).unwrap();
        let (out, _) = register_file_reference(text, &file, &ids()).unwrap();
        assert!(out.contains("path = $1Plugin.swift;"));
    }
}
