//! Configuration file support for `.nbbridge.toml`

use anyhow::{Context, Result};
use nbbridge_notebook::ConvertOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the project and home directories
pub const CONFIG_FILE_NAME: &str = ".nbbridge.toml";

/// Configuration file structure for `.nbbridge.toml`
///
/// Configuration files can be placed in:
/// - User home directory: `~/.nbbridge.toml` (user defaults)
/// - Project directory: `./.nbbridge.toml` (project defaults)
/// - Custom location via `--config` (replaces both)
///
/// Precedence order (highest to lowest):
/// 1. Project config (`./.nbbridge.toml`)
/// 2. User config (`~/.nbbridge.toml`)
/// 3. Built-in defaults
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for written Jupyter notebooks
    pub ipynb: Option<IpynbConfig>,
    /// Settings for written source notebooks
    pub source: Option<SourceConfig>,
}

/// `[ipynb]` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct IpynbConfig {
    /// JSON indentation width
    pub indent: Option<usize>,
}

/// `[source]` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// End written source notebooks with a newline
    pub trailing_newline: Option<bool>,
}

impl Config {
    /// Load the explicit config file, or discover user and project configs
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be read or parsed.
    /// Problems with discovered files are logged and the file is skipped.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => {
                let user = dirs::home_dir()
                    .and_then(|home| Self::load_optional(&home.join(CONFIG_FILE_NAME)));
                let project = Self::load_optional(&PathBuf::from(CONFIG_FILE_NAME));
                Ok(Self::merge(user, project))
            }
        }
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // TOML errors carry line/column information; keep it in the message
        toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file {}: {e}", path.display())
        })
    }

    fn load_optional(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match Self::load_from_file(path) {
            Ok(config) => {
                log::debug!("loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {e:#}", path.display());
                None
            }
        }
    }

    /// Merge user and project configs, project values winning key by key
    #[must_use]
    pub fn merge(user_config: Option<Self>, project_config: Option<Self>) -> Self {
        let mut merged = user_config.unwrap_or_default();

        if let Some(project) = project_config {
            if let Some(ipynb) = project.ipynb {
                let mut merged_ipynb = merged.ipynb.unwrap_or_default();
                if let Some(indent) = ipynb.indent {
                    merged_ipynb.indent = Some(indent);
                }
                merged.ipynb = Some(merged_ipynb);
            }
            if let Some(source) = project.source {
                let mut merged_source = merged.source.unwrap_or_default();
                if let Some(trailing_newline) = source.trailing_newline {
                    merged_source.trailing_newline = Some(trailing_newline);
                }
                merged.source = Some(merged_source);
            }
        }

        merged
    }

    /// Conversion options with built-in defaults filled in
    #[must_use]
    pub fn convert_options(&self) -> ConvertOptions {
        let defaults = ConvertOptions::default();
        ConvertOptions {
            indent: self
                .ipynb
                .and_then(|c| c.indent)
                .unwrap_or(defaults.indent),
            trailing_newline: self
                .source
                .and_then(|c| c.trailing_newline)
                .unwrap_or(defaults.trailing_newline),
        }
    }
}
