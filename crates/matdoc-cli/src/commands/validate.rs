// crates/matdoc-cli/src/commands/validate.rs
//
// `matdoc validate`: check an encoded materials document.

use std::path::PathBuf;

use clap::Args;
use matdoc_core::{FieldMap, MaterialsDocument, ValidationError};

use super::{read_json, Context};
use crate::error::CliError;
use crate::output::{document_rows, error_rows, format_json, format_table, OutputFormat};

#[derive(Debug, Args)]
pub struct ValidateCmd {
    /// JSON file holding the document.
    #[arg(long)]
    pub document: PathBuf,
}

/// Validate the document file. The outer error covers unreadable input; the
/// inner result is the validation outcome.
pub fn execute(
    cmd: &ValidateCmd,
    ctx: &Context,
) -> Result<Result<MaterialsDocument, ValidationError>, CliError> {
    let fields: FieldMap = read_json(&cmd.document)?;
    Ok(MaterialsDocument::from_fields_with(&fields, &ctx.validation))
}

/// Run the validate subcommand. Fails after printing the report when the
/// document is invalid.
pub fn run(cmd: &ValidateCmd, ctx: &Context) -> Result<(), CliError> {
    match execute(cmd, ctx)? {
        Ok(doc) => {
            tracing::info!(material_id = doc.material_id(), "document is valid");
            match ctx.output {
                OutputFormat::Json => println!("{}", format_json(&doc)?),
                OutputFormat::Table => println!("{}", format_table(&document_rows(&doc))),
            }
            Ok(())
        }
        Err(err) => {
            match ctx.output {
                OutputFormat::Json => {
                    let report: Vec<_> = err
                        .errors
                        .iter()
                        .map(|e| serde_json::json!({"loc": e.loc, "msg": e.message}))
                        .collect();
                    println!("{}", format_json(&report)?);
                }
                OutputFormat::Table => println!("{}", format_table(&error_rows(&err))),
            }
            Err(err.into())
        }
    }
}
