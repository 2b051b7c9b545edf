// crates/matdoc-core/src/error.rs

use std::fmt;

use thiserror::Error;

/// One offending field within a validated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted location of the field, e.g. `material_id` or `origins.0.task_id`.
    pub loc: String,
    pub message: String,
}

impl FieldError {
    pub fn new(loc: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            message: message.into(),
        }
    }

    pub fn missing(loc: impl Into<String>) -> Self {
        Self::new(loc, "field required")
    }

    /// Nest this error under a parent location. An empty location refers to
    /// the parent itself.
    pub fn within(mut self, parent: &str) -> Self {
        self.loc = if self.loc.is_empty() {
            parent.to_string()
        } else {
            format!("{}.{}", parent, self.loc)
        };
        self
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.loc, self.message)
    }
}

/// A record failed validation. Lists every field at fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    /// Name of the record type being validated.
    pub model: &'static str,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(model: &'static str, errors: Vec<FieldError>) -> Self {
        Self { model, errors }
    }

    /// Locations of all offending fields.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.loc.as_str())
    }

    /// Whether `loc` (or a location nested under it) is among the errors.
    pub fn has_field(&self, loc: &str) -> bool {
        self.fields()
            .any(|f| f == loc || f.strip_prefix(loc).is_some_and(|rest| rest.starts_with('.')))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.errors.len() == 1 { "" } else { "s" };
        write!(
            f,
            "{} validation error{} for {}",
            self.errors.len(),
            plural,
            self.model
        )?;
        for err in &self.errors {
            write!(f, "\n  {}", err)?;
        }
        Ok(())
    }
}

/// The structure metadata deriver could not describe a structure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DerivationError {
    /// The structure has no sites.
    #[error("structure has no sites")]
    EmptyStructure,

    /// The lattice does not span a positive, finite volume.
    #[error("degenerate lattice: cell volume {volume}")]
    DegenerateLattice { volume: f64 },

    /// Failure reported by an external deriver implementation.
    #[error("{0}")]
    Failed(String),
}

/// Failure of the build operation: either the merged fields did not validate
/// or metadata derivation failed. The inner error is carried unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("structure metadata derivation failed: {0}")]
    Derivation(#[from] DerivationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_field() {
        let err = ValidationError::new(
            "MaterialsDocument",
            vec![
                FieldError::missing("material_id"),
                FieldError::new("deprecated", "value could not be parsed to a boolean"),
            ],
        );
        let text = err.to_string();
        assert!(text.starts_with("2 validation errors for MaterialsDocument"));
        assert!(text.contains("material_id: field required"));
        assert!(text.contains("deprecated: value could not be parsed"));
    }

    #[test]
    fn has_field_matches_nested_locations() {
        let err = ValidationError::new(
            "MaterialsDocument",
            vec![FieldError::missing("task_id").within("0").within("origins")],
        );
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["origins.0.task_id"]);
        assert!(err.has_field("origins"));
        assert!(err.has_field("origins.0.task_id"));
        assert!(!err.has_field("origin"));
    }

    #[test]
    fn build_error_names_the_failed_call() {
        let err: BuildError = DerivationError::EmptyStructure.into();
        assert_eq!(
            err.to_string(),
            "structure metadata derivation failed: structure has no sites"
        );
        assert!(matches!(err, BuildError::Derivation(DerivationError::EmptyStructure)));
    }
}
