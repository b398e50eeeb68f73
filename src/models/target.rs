use serde::Serialize;

use super::Identifier;

/// Runner target group in a Flutter macOS project.
pub const DEFAULT_GROUP_ID: &str = "33CC10EF2044A3C60003C045";
pub const DEFAULT_GROUP_NAME: &str = "Runner";
/// `AppDelegate.swift` file reference inside the Runner group.
pub const DEFAULT_GROUP_ANCHOR_ID: &str = "33CC10F02044A3C60003C045";
pub const DEFAULT_GROUP_ANCHOR_NAME: &str = "AppDelegate.swift";
/// Sources build phase of the Runner target.
pub const DEFAULT_PHASE_ID: &str = "33CC10EA2044A3C60003C045";
pub const DEFAULT_PHASE_NAME: &str = "Sources";
/// `AppDelegate.swift in Sources` build file inside that phase.
pub const DEFAULT_PHASE_ANCHOR_ID: &str = "33CC10F12044A3C60003C045";
pub const DEFAULT_PHASE_ANCHOR_NAME: &str = "AppDelegate.swift in Sources";

/// An existing record as it is written in the manifest: `<id> /* <label> */`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRef {
    pub id: Identifier,
    pub label: String,
}

impl RecordRef {
    pub fn new(id: Identifier, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// Where a new source file is attached.
///
/// The new group child is inserted directly before `group_anchor` inside the
/// `children` list of `group`; the new build file directly before
/// `phase_anchor` inside the `files` list of `phase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchTarget {
    pub group: RecordRef,
    pub group_anchor: RecordRef,
    pub phase: RecordRef,
    pub phase_anchor: RecordRef,
}

impl Default for PatchTarget {
    fn default() -> Self {
        Self {
            group: RecordRef::new(Identifier::from_literal(DEFAULT_GROUP_ID), DEFAULT_GROUP_NAME),
            group_anchor: RecordRef::new(
                Identifier::from_literal(DEFAULT_GROUP_ANCHOR_ID),
                DEFAULT_GROUP_ANCHOR_NAME,
            ),
            phase: RecordRef::new(Identifier::from_literal(DEFAULT_PHASE_ID), DEFAULT_PHASE_NAME),
            phase_anchor: RecordRef::new(
                Identifier::from_literal(DEFAULT_PHASE_ANCHOR_ID),
                DEFAULT_PHASE_ANCHOR_NAME,
            ),
        }
    }
}
