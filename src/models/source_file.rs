use std::borrow::Cow;
use std::path::Path;

use serde::Serialize;

use crate::error::PatchError;

/// The `lastKnownFileType` recorded for a file reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum FileKind {
    Swift,
    ObjC,
    ObjCpp,
    C,
    Cpp,
    Header,
    Text,
    /// Explicit override, written through verbatim.
    Custom(String),
}

impl FileKind {
    /// Detect the kind from a file name's extension.
    pub fn from_file_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        match ext {
            "swift" => Self::Swift,
            "m" => Self::ObjC,
            "mm" => Self::ObjCpp,
            "c" => Self::C,
            "cpp" | "cc" => Self::Cpp,
            "h" => Self::Header,
            _ => Self::Text,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Swift => "sourcecode.swift",
            Self::ObjC => "sourcecode.c.objc",
            Self::ObjCpp => "sourcecode.cpp.objcpp",
            Self::C => "sourcecode.c.c",
            Self::Cpp => "sourcecode.cpp.cpp",
            Self::Header => "sourcecode.c.h",
            Self::Text => "text",
            Self::Custom(kind) => kind,
        }
    }
}

/// Render `value` as an OpenStep plist string: bare when it only holds
/// `[A-Za-z0-9_$/:.-]`, otherwise double-quoted with `\` and `"` escaped.
pub fn plist_string(value: &str) -> Cow<'_, str> {
    let bare =
        |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '/' | ':' | '.' | '-');
    if !value.is_empty() && value.chars().all(bare) {
        return Cow::Borrowed(value);
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

impl From<FileKind> for String {
    fn from(kind: FileKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A source file to register, named relative to its group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub name: String,
    pub kind: FileKind,
}

impl SourceFile {
    /// Build a source file, detecting its kind unless `kind` is given.
    ///
    /// The name ends up inside `/* ... */` comments, so characters that would
    /// end a comment or a line are rejected. Values written into the record
    /// go through [`plist_string`].
    pub fn new(name: impl Into<String>, kind: Option<String>) -> Result<Self, PatchError> {
        let name = name.into();
        let forbidden = |c: char| matches!(c, '/' | '*' | '"' | ';' | '\n' | '\r');
        if name.trim().is_empty() || name.contains(forbidden) {
            return Err(PatchError::InvalidFileName(name));
        }

        let kind = match kind {
            Some(k) if k.trim().is_empty() || k.contains(char::is_control) => {
                return Err(PatchError::InvalidFileType(k));
            }
            Some(k) => FileKind::Custom(k),
            None => FileKind::from_file_name(&name),
        };
        Ok(Self { name, kind })
    }

    /// The `path = ...;` value.
    pub fn path_value(&self) -> Cow<'_, str> {
        plist_string(&self.name)
    }

    /// The `lastKnownFileType = ...;` value.
    pub fn kind_value(&self) -> Cow<'_, str> {
        plist_string(self.kind.as_str())
    }
}
