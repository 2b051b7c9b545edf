// crates/matdoc-cli/src/config.rs
//
// Runtime configuration for the matdoc CLI.
// Loaded from a TOML file or populated with defaults.

use std::fs;
use std::path::{Path, PathBuf};

use matdoc_core::ValidationConfig;
use serde::Deserialize;

use crate::error::CliError;
use crate::output::OutputFormat;

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Default output format when `--output` is not given.
    #[serde(default)]
    pub output: OutputFormat,

    /// Document validation rules applied by `build` and `validate`.
    #[serde(default)]
    pub validation: ValidationConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output: OutputFormat::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `~/.matdoc/config.toml`, when a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".matdoc").join("config.toml"))
    }
}
