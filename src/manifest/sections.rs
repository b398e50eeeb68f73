//! Read-only scan of the `/* Begin X section */ ... /* End X section */`
//! regions of a manifest.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\* Begin (\w+) section \*/").expect("valid regex"));

/// A top-level record opens with `<24 hex digits> ... = {` on its own line.
static RECORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[0-9A-F]{24}\b[^\n]*= \{").expect("valid regex"));

/// One section and the number of records it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub records: usize,
}

/// List the sections of `text` in file order.
///
/// A section whose end marker is missing is skipped.
pub fn scan_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    for caps in BEGIN.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end_marker = format!("/* End {} section */", name.as_str());
        let body_start = whole.end();
        let Some(len) = text[body_start..].find(&end_marker) else {
            continue;
        };
        let body = &text[body_start..body_start + len];
        sections.push(Section {
            name: name.as_str().to_string(),
            records: RECORD.find_iter(body).count(),
        });
    }
    sections
}
