use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::error::PatchError;

/// Number of hex digits in a manifest object identifier.
pub const IDENTIFIER_LEN: usize = 24;

/// An object identifier as it appears in a `project.pbxproj` file.
///
/// Always [`IDENTIFIER_LEN`] characters from `0-9A-F`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Generate a fresh identifier from a random v4 UUID, truncated to 24 hex
    /// digits and uppercased.
    ///
    /// Nothing checks the result against identifiers already in a manifest.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..IDENTIFIER_LEN].to_ascii_uppercase())
    }

    /// Wrap a literal known to be well formed.
    pub(crate) fn from_literal(s: &'static str) -> Self {
        debug_assert!(s.parse::<Self>().is_ok(), "malformed identifier literal {s}");
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == IDENTIFIER_LEN
            && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F'));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(PatchError::InvalidIdentifier(s.to_string()))
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// The pair of identifiers a single registration needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedIds {
    /// Key of the new `PBXFileReference` record.
    pub file_ref: Identifier,
    /// Key of the new `PBXBuildFile` record; points at `file_ref`.
    pub build_file: Identifier,
}

impl GeneratedIds {
    pub fn generate() -> Self {
        Self {
            file_ref: Identifier::generate(),
            build_file: Identifier::generate(),
        }
    }
}
