//! Filesystem module.
//!
//! Provides:
//! - Name sanitizing and base-name building
//! - Collision-free destination paths
//! - Metadata-preserving copies

pub mod naming;
pub mod paths;

pub use naming::{extension_of, sanitize_name, NamingTemplate, UNNAMED};
pub use paths::{copy_with_metadata, default_output_dir, ensure_dir, unique_destination};
