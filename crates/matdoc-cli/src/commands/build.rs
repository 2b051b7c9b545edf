// crates/matdoc-cli/src/commands/build.rs
//
// `matdoc build`: build a materials document from a structure file.

use std::path::PathBuf;

use clap::Args;
use matdoc_core::{CompositionDeriver, DocumentBuilder, FieldMap, MaterialsDocument, Structure};

use super::{read_json, Context};
use crate::error::CliError;
use crate::output::{document_rows, format_json, format_table, OutputFormat};

#[derive(Debug, Args)]
pub struct BuildCmd {
    /// JSON file holding the structure.
    #[arg(long)]
    pub structure: PathBuf,

    /// Identifier of the material, e.g. mp-149.
    #[arg(long)]
    pub material_id: String,

    /// JSON object of field overrides applied on top of derived metadata.
    #[arg(long)]
    pub overrides: Option<PathBuf>,
}

/// Build the document without printing it.
pub fn execute(cmd: &BuildCmd, ctx: &Context) -> Result<MaterialsDocument, CliError> {
    let structure: Structure = read_json(&cmd.structure)?;
    let overrides: FieldMap = match &cmd.overrides {
        Some(path) => read_json(path)?,
        None => FieldMap::new(),
    };
    tracing::info!(
        material_id = %cmd.material_id,
        sites = structure.num_sites(),
        overrides = overrides.len(),
        "building materials document"
    );

    let builder = DocumentBuilder::new(CompositionDeriver).with_config(ctx.validation.clone());
    Ok(builder.build(&structure, &cmd.material_id, overrides)?)
}

/// Run the build subcommand.
pub fn run(cmd: &BuildCmd, ctx: &Context) -> Result<(), CliError> {
    let doc = execute(cmd, ctx)?;
    match ctx.output {
        OutputFormat::Json => println!("{}", format_json(&doc)?),
        OutputFormat::Table => println!("{}", format_table(&document_rows(&doc))),
    }
    Ok(())
}
