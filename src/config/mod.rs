//! Configuration module for the assignment collector.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{Config, HeaderConfig, OutputConfig};
pub use validation::{validate_config, validate_font_size};
