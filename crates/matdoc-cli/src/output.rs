// crates/matdoc-cli/src/output.rs
//
// Output formatting utilities for the matdoc CLI.
// Supports table and JSON output modes.

use clap::ValueEnum;
use matdoc_core::{MaterialsDocument, StructureMetadata, ValidationError};
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};

use crate::error::CliError;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Field/value table for reading at a terminal.
    Table,
    /// Pretty-printed JSON for machine consumption (default).
    #[default]
    Json,
}

/// One row of a field/value table.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct FieldRow {
    pub field: String,
    pub value: String,
}

impl FieldRow {
    fn new(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(data).map_err(|e| CliError::Output(e.to_string()))
}

fn or_unset<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Summary rows for a document: identity, bookkeeping, then metadata.
pub fn document_rows(doc: &MaterialsDocument) -> Vec<FieldRow> {
    let mut rows = vec![
        FieldRow::new("material_id", doc.material_id()),
        FieldRow::new(
            "structure",
            or_unset(doc.structure.as_ref().map(|s| format!("{} sites", s.num_sites()))),
        ),
        FieldRow::new("initial_structures", doc.initial_structures.len().to_string()),
        FieldRow::new("task_ids", doc.task_ids.join(", ")),
        FieldRow::new("deprecated_tasks", doc.deprecated_tasks.join(", ")),
        FieldRow::new("deprecated", or_unset(doc.deprecated)),
        FieldRow::new("last_updated", or_unset(doc.last_updated.map(|t| t.to_rfc3339()))),
        FieldRow::new("created_at", or_unset(doc.created_at.map(|t| t.to_rfc3339()))),
        FieldRow::new("task_types", doc.task_types.len().to_string()),
        FieldRow::new("origins", doc.origins.len().to_string()),
    ];
    rows.extend(metadata_rows(&doc.metadata));
    rows
}

/// Rows for the structure-derived fields.
pub fn metadata_rows(meta: &StructureMetadata) -> Vec<FieldRow> {
    let elements = meta.elements.as_ref().map(|els| {
        els.iter()
            .map(|el| el.symbol())
            .collect::<Vec<_>>()
            .join(" ")
    });
    let symmetry = meta
        .symmetry
        .as_ref()
        .and_then(|s| s.symbol.clone().or_else(|| s.number.map(|n| n.to_string())));
    vec![
        FieldRow::new("formula_pretty", or_unset(meta.formula_pretty.as_deref())),
        FieldRow::new("formula_anonymous", or_unset(meta.formula_anonymous.as_deref())),
        FieldRow::new("chemsys", or_unset(meta.chemsys.as_deref())),
        FieldRow::new("elements", or_unset(elements)),
        FieldRow::new("nsites", or_unset(meta.nsites)),
        FieldRow::new("nelements", or_unset(meta.nelements)),
        FieldRow::new("volume", or_unset(meta.volume.map(|v| format!("{:.4}", v)))),
        FieldRow::new("density", or_unset(meta.density.map(|v| format!("{:.4}", v)))),
        FieldRow::new(
            "density_atomic",
            or_unset(meta.density_atomic.map(|v| format!("{:.4}", v))),
        ),
        FieldRow::new("symmetry", or_unset(symmetry)),
    ]
}

/// One row per offending field.
pub fn error_rows(err: &ValidationError) -> Vec<FieldRow> {
    err.errors
        .iter()
        .map(|e| FieldRow::new(&e.loc, e.message.clone()))
        .collect()
}
