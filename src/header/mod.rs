//! Document header stamping.
//!
//! Stamping is an optional capability handed to the collector. The only
//! implementation writes into `.docx` headers; tests substitute their own.

pub mod docx;

use std::ffi::OsStr;
use std::path::Path;

pub use docx::DocxHeaderStamper;

/// Extension of documents whose headers can be stamped.
pub const DOCX_EXTENSION: &str = ".docx";

/// Default font size of the stamped label, in points.
pub const DEFAULT_FONT_SIZE_PT: f32 = 10.0;

/// Writes a label into a document's primary header.
pub trait HeaderStamper {
    /// Stamp `label` into the header of the document at `path`.
    ///
    /// Returns `false` on any failure; the document is then left as it was.
    fn stamp(&self, path: &Path, label: &str) -> bool;
}

/// Whether a file extension (with its dot) names a stampable document.
pub fn is_stampable(ext: &OsStr) -> bool {
    ext.eq_ignore_ascii_case(DOCX_EXTENSION)
}

/// Probe for a usable stamper at startup.
pub fn detect_stamper(font_size_pt: f32) -> Option<Box<dyn HeaderStamper>> {
    Some(Box::new(DocxHeaderStamper::new(font_size_pt)))
}
