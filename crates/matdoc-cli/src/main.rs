// crates/matdoc-cli/src/main.rs
//
// CLI entrypoint for the matdoc tools.
//
// Builds materials documents from structure files, validates encoded
// documents, and describes the metadata derived from a structure.

mod commands;
mod config;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::build::BuildCmd;
use commands::describe::DescribeCmd;
use commands::validate::ValidateCmd;
use commands::Context;
use config::CliConfig;
use error::CliError;
use output::OutputFormat;

/// matdoc: materials document builder and validator.
#[derive(Parser, Debug)]
#[command(
    name = "matdoc",
    version,
    about = "Build and validate materials documents with property provenance"
)]
struct Cli {
    /// Path to the TOML config file (defaults to ~/.matdoc/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format; overrides the config file.
    #[arg(long, global = true, value_enum)]
    output: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Build a document from a structure, an identifier and optional overrides.
    Build(BuildCmd),

    /// Validate an encoded document.
    Validate(ValidateCmd),

    /// Print the metadata derived from a structure.
    Describe(DescribeCmd),
}

/// Load the config, keeping the reason for any fallback so it can be logged
/// once tracing is up.
fn load_config(explicit: Option<&PathBuf>) -> Result<(CliConfig, Option<String>), CliError> {
    let Some(path) = explicit.cloned().or_else(CliConfig::default_path) else {
        return Ok((CliConfig::default(), None));
    };
    match CliConfig::load(&path) {
        Ok(config) => Ok((config, None)),
        Err(CliError::Io { path, source }) => Ok((
            CliConfig::default(),
            Some(format!("config {} not loaded ({}); using defaults", path.display(), source)),
        )),
        Err(e) => Err(e),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (config, fallback) = load_config(cli.config.as_ref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(reason) = fallback {
        tracing::warn!("{}", reason);
    }

    let ctx = Context {
        output: cli.output.unwrap_or(config.output),
        validation: config.validation,
    };

    match &cli.command {
        Commands::Build(cmd) => commands::build::run(cmd, &ctx)?,
        Commands::Validate(cmd) => commands::validate::run(cmd, &ctx)?,
        Commands::Describe(cmd) => commands::describe::run(cmd, &ctx)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from([
            "matdoc",
            "build",
            "--structure",
            "si.json",
            "--material-id",
            "mp-149",
            "--output",
            "table",
        ]);
        assert_eq!(cli.output, Some(OutputFormat::Table));
        match cli.command {
            Commands::Build(cmd) => {
                assert_eq!(cmd.material_id, "mp-149");
                assert!(cmd.overrides.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let (config, fallback) = load_config(Some(&path)).unwrap();
        assert_eq!(config.log_level, "info");
        assert!(fallback.unwrap().contains("absent.toml"));
    }
}
