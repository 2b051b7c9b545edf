// crates/matdoc-cli/src/commands/describe.rs
//
// `matdoc describe`: print the metadata derived from a structure file.

use std::path::PathBuf;

use clap::Args;
use matdoc_core::{CompositionDeriver, Structure, StructureMetadata, StructureMetadataDeriver};

use super::{read_json, Context};
use crate::error::CliError;
use crate::output::{format_json, format_table, metadata_rows, OutputFormat};

#[derive(Debug, Args)]
pub struct DescribeCmd {
    /// JSON file holding the structure.
    #[arg(long)]
    pub structure: PathBuf,
}

pub fn execute(cmd: &DescribeCmd) -> Result<StructureMetadata, CliError> {
    let structure: Structure = read_json(&cmd.structure)?;
    Ok(CompositionDeriver.derive(&structure)?)
}

/// Run the describe subcommand.
pub fn run(cmd: &DescribeCmd, ctx: &Context) -> Result<(), CliError> {
    let meta = execute(cmd)?;
    match ctx.output {
        OutputFormat::Json => println!("{}", format_json(&meta)?),
        OutputFormat::Table => println!("{}", format_table(&metadata_rows(&meta))),
    }
    Ok(())
}
