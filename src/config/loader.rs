//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::header::DEFAULT_FONT_SIZE_PT;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "collector.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub header: HeaderConfig,
}

/// Output location configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Folder under which default output folders are created.
    #[serde(default)]
    pub downloads_directory: Option<PathBuf>,
}

/// Header stamping configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// Answer pre-selected when asking whether to stamp headers.
    #[serde(default)]
    pub stamp_by_default: bool,

    /// Font size of the stamped label, in points.
    #[serde(default = "default_font_size")]
    pub font_size_pt: f32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            stamp_by_default: false,
            font_size_pt: DEFAULT_FONT_SIZE_PT,
        }
    }
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE_PT
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Config(format!(
                    "Failed to read configuration file {}: {}",
                    path.display(),
                    e
                ))
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the first config file that exists, or defaults when none does.
    ///
    /// An explicit path must exist. Otherwise `collector.toml` in the working
    /// directory is tried, then `config.toml` in the platform config folder.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        for candidate in Self::candidate_paths() {
            if candidate.is_file() {
                return Ok((Self::load(&candidate)?, Some(candidate)));
            }
        }

        Ok((Self::default(), None))
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dirs) = ProjectDirs::from("", "", "assignment-collector") {
            paths.push(dirs.config_dir().join("config.toml"));
        }
        paths
    }

    /// Get the effective downloads directory.
    pub fn downloads_directory(&self) -> PathBuf {
        self.output.downloads_directory.clone().unwrap_or_else(|| {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("downloads")
        })
    }
}
