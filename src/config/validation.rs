//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Smallest accepted header font size, in points.
const MIN_FONT_SIZE_PT: f32 = 1.0;

/// Largest accepted header font size, in points.
const MAX_FONT_SIZE_PT: f32 = 72.0;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_font_size(config.header.font_size_pt)?;

    if let Some(dir) = &config.output.downloads_directory {
        if dir.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                field: "downloads_directory".to_string(),
                message: "Directory cannot be empty".to_string(),
            });
        }
    }

    Ok(())
}

/// Validate the header font size.
pub fn validate_font_size(size: f32) -> Result<()> {
    if !size.is_finite() || !(MIN_FONT_SIZE_PT..=MAX_FONT_SIZE_PT).contains(&size) {
        return Err(Error::ConfigValidation {
            field: "font_size_pt".to_string(),
            message: format!(
                "Font size must be between {} and {} points (got {})",
                MIN_FONT_SIZE_PT, MAX_FONT_SIZE_PT, size
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_font_size_bounds() {
        assert!(validate_font_size(10.0).is_ok());
        assert!(validate_font_size(1.0).is_ok());
        assert!(validate_font_size(72.0).is_ok());
        assert!(validate_font_size(0.5).is_err());
        assert!(validate_font_size(100.0).is_err());
        assert!(validate_font_size(f32::NAN).is_err());
    }

    #[test]
    fn test_empty_downloads_directory() {
        let mut config = Config::default();
        config.output.downloads_directory = Some(PathBuf::new());
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { .. })
        ));
    }
}
