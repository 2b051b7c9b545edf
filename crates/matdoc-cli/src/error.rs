// crates/matdoc-cli/src/error.rs

use std::path::PathBuf;

use matdoc_core::{BuildError, DerivationError, ValidationError};
use thiserror::Error;

/// Errors surfaced by `matdoc` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input or config file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An input file is not valid JSON for the expected shape.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The config file is not valid TOML for the config schema.
    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    /// Output could not be rendered.
    #[error("output error: {0}")]
    Output(String),
}
