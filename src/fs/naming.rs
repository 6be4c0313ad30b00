//! Filename generation and manipulation.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Placeholder used when a name sanitizes down to nothing.
pub const UNNAMED: &str = "unnamed";

/// Characters Windows refuses in file names.
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Map an arbitrary string to a name that is safe to use as a file name.
///
/// Reserved characters and underscores become spaces, runs of spaces collapse
/// to one, and surrounding whitespace and trailing dots are stripped. A name
/// that ends up empty becomes [`UNNAMED`].
pub fn sanitize_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c == '_' || RESERVED_CHARS.contains(&c) {
                ' '
            } else {
                c
            }
        })
        .collect();

    let collapsed = SPACE_RUN.replace_all(&replaced, " ");

    // "name ." must not leave a trailing space behind once the dot goes
    let mut trimmed = collapsed.trim();
    loop {
        let next = trimmed.trim_end_matches('.').trim();
        if next.len() == trimmed.len() {
            break;
        }
        trimmed = next;
    }

    if trimmed.is_empty() {
        UNNAMED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Extension of a file name, including its leading dot.
///
/// Works on the raw name so extensions that are not valid UTF-8 survive.
/// Leading dots do not start an extension, so `.bashrc` has none.
pub fn extension_of(file_name: &OsStr) -> OsString {
    let bytes = file_name.as_encoded_bytes();
    let skip = bytes.iter().take_while(|&&b| b == b'.').count();
    if !bytes[skip..].contains(&b'.') {
        return OsString::new();
    }

    match Path::new(file_name).extension() {
        Some(ext) => {
            let mut dotted = OsString::from(".");
            dotted.push(ext);
            dotted
        }
        None => OsString::new(),
    }
}

/// Prefix and suffix wrapped around every student name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingTemplate {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl NamingTemplate {
    /// Create a template from optional prefix and suffix.
    pub fn new(prefix: Option<String>, suffix: Option<String>) -> Self {
        Self { prefix, suffix }
    }

    /// Build the base name for a student whose name is already sanitized.
    ///
    /// Parts are joined by single spaces: prefix, student, suffix. Blank
    /// prefix or suffix values are left out.
    pub fn base_name(&self, student: &str) -> String {
        let prefix = Self::safe_part(self.prefix.as_deref());
        let suffix = Self::safe_part(self.suffix.as_deref());

        [prefix.as_deref(), Some(student), suffix.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn safe_part(part: Option<&str>) -> Option<String> {
        part.filter(|p| !p.trim().is_empty()).map(sanitize_name)
    }
}
