// crates/matdoc-core/src/material.rs
//
// MaterialsDocument: the validated aggregate record for one material.
//
// A document combines its own fields with an embedded StructureMetadata
// value. All construction paths, including serde decoding, go through
// `from_fields_with`, so an invalid document is never observable.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::build::DocumentBuilder;
use crate::coerce::{self, FieldMap, FieldReader};
use crate::config::{UnknownFieldPolicy, ValidationConfig};
use crate::deriver::CompositionDeriver;
use crate::error::{BuildError, FieldError, ValidationError};
use crate::metadata::StructureMetadata;
use crate::provenance::{coerce_origin, PropertyOrigin};
use crate::structure::Structure;

/// Definition of a full materials document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FieldMap")]
pub struct MaterialsDocument {
    /// Universal reference across property documents, conventionally
    /// `mp-<digits>`. Fixed at construction.
    material_id: String,

    /// The best structure for this material.
    pub structure: Option<Structure>,

    /// Initial structures of the calculations behind this material, in the
    /// order they were appended.
    pub initial_structures: Vec<Structure>,

    /// Every calculation that contributed to this document.
    pub task_ids: Vec<String>,

    /// Contributing calculations that are explicitly excluded.
    pub deprecated_tasks: Vec<String>,

    /// Set when no calculation of sufficient quality exists.
    pub deprecated: Option<bool>,

    /// Timestamp of the most recent calculation.
    pub last_updated: Option<DateTime<Utc>>,

    /// Timestamp of the first calculation.
    pub created_at: Option<DateTime<Utc>>,

    /// Calculation type of each task, keyed by task id.
    pub task_types: BTreeMap<String, String>,

    /// Append-only provenance trail for individual properties.
    pub origins: Vec<PropertyOrigin>,

    #[serde(flatten)]
    pub metadata: StructureMetadata,
}

impl MaterialsDocument {
    pub const MODEL: &'static str = "MaterialsDocument";

    /// Encoded names of the document's own fields (metadata excluded).
    pub const FIELDS: &'static [&'static str] = &[
        "material_id",
        "structure",
        "initial_structures",
        "task_ids",
        "deprecated_tasks",
        "deprecated",
        "last_updated",
        "created_at",
        "task_types",
        "origins",
    ];

    /// Build a document from a structure and identifier using the
    /// composition-based deriver and default validation.
    ///
    /// See [`DocumentBuilder::build`] for the merge and defaulting rules.
    pub fn build(
        structure: &Structure,
        material_id: &str,
        overrides: FieldMap,
    ) -> Result<Self, BuildError> {
        DocumentBuilder::new(CompositionDeriver).build(structure, material_id, overrides)
    }

    /// Validate a field map with the default configuration.
    pub fn from_fields(fields: &FieldMap) -> Result<Self, ValidationError> {
        Self::from_fields_with(fields, &ValidationConfig::default())
    }

    /// Validate a field map. Absent collections become fresh empty ones;
    /// absent optional fields stay unset.
    pub fn from_fields_with(
        fields: &FieldMap,
        config: &ValidationConfig,
    ) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::new(fields);

        let material_id = reader.required("material_id", coerce::non_empty_string);
        let structure = reader.optional("structure", coerce::decode::<Structure>);
        let initial_structures = reader.or_default("initial_structures", |v| {
            coerce::list(v, coerce::decode::<Structure>)
        });
        let task_ids = reader.or_default("task_ids", |v| coerce::list(v, coerce::string));
        let deprecated_tasks =
            reader.or_default("deprecated_tasks", |v| coerce::list(v, coerce::string));
        let deprecated = reader.optional("deprecated", coerce::boolean);
        let last_updated = reader.optional("last_updated", coerce::timestamp);
        let created_at = reader.optional("created_at", coerce::timestamp);
        let task_types = reader.or_default("task_types", coerce::string_map);
        let origins = reader.or_default("origins", |v| coerce::list(v, coerce_origin));
        let metadata: StructureMetadata = reader.flattened(StructureMetadata::FIELDS);

        for key in fields.keys() {
            if Self::FIELDS.contains(&key.as_str()) || StructureMetadata::is_field(key) {
                continue;
            }
            match config.unknown_fields {
                UnknownFieldPolicy::Ignore => {
                    tracing::debug!(field = %key, "ignoring unknown materials document field");
                }
                UnknownFieldPolicy::Reject => {
                    reader.push(FieldError::new(key.as_str(), "extra fields not permitted"));
                }
            }
        }

        if config.enforce_task_references {
            for err in task_reference_errors(&task_ids, &deprecated_tasks, &task_types) {
                reader.push(err);
            }
        }

        reader.finish(Self::MODEL)?;
        let material_id = material_id.ok_or_else(|| {
            ValidationError::new(Self::MODEL, vec![FieldError::missing("material_id")])
        })?;

        Ok(Self {
            material_id,
            structure,
            initial_structures,
            task_ids,
            deprecated_tasks,
            deprecated,
            last_updated,
            created_at,
            task_types,
            origins,
            metadata,
        })
    }

    pub fn material_id(&self) -> &str {
        &self.material_id
    }

    /// Most recently appended provenance entry for `property`.
    pub fn origin_for(&self, property: &str) -> Option<&PropertyOrigin> {
        self.origins.iter().rev().find(|o| o.property() == property)
    }

    /// Encoded field map; `from_fields` on the result yields an equal document.
    pub fn to_fields(&self) -> Result<FieldMap, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(fields) => Ok(fields),
            _ => Err(serde::ser::Error::custom("document did not encode to an object")),
        }
    }
}

impl TryFrom<FieldMap> for MaterialsDocument {
    type Error = ValidationError;

    fn try_from(fields: FieldMap) -> Result<Self, Self::Error> {
        Self::from_fields(&fields)
    }
}

fn task_reference_errors(
    task_ids: &[String],
    deprecated_tasks: &[String],
    task_types: &BTreeMap<String, String>,
) -> Vec<FieldError> {
    let known: BTreeSet<&str> = task_ids.iter().map(String::as_str).collect();
    let mut errors = Vec::new();
    for key in task_types.keys() {
        if !known.contains(key.as_str()) {
            errors.push(FieldError::new(
                format!("task_types.{}", key),
                "task id is not listed in task_ids",
            ));
        }
    }
    for (i, id) in deprecated_tasks.iter().enumerate() {
        if !known.contains(id.as_str()) {
            errors.push(FieldError::new(
                format!("deprecated_tasks.{}", i),
                format!("deprecated task '{}' is not listed in task_ids", id),
            ));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::structure::{Lattice, Site};
    use chrono::TimeZone;
    use serde_json::json;

    fn fields(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn iron() -> Structure {
        Structure::new(
            Lattice::cubic(2.87),
            vec![
                Site::new(Element::Fe, [0.0, 0.0, 0.0]),
                Site::new(Element::Fe, [0.5, 0.5, 0.5]),
            ],
        )
    }

    #[test]
    fn minimal_document_gets_fresh_defaults() {
        let doc = MaterialsDocument::from_fields(&fields(json!({"material_id": "mp-13"}))).unwrap();
        assert_eq!(doc.material_id(), "mp-13");
        assert!(doc.structure.is_none());
        assert!(doc.initial_structures.is_empty());
        assert!(doc.task_ids.is_empty());
        assert!(doc.deprecated_tasks.is_empty());
        assert!(doc.task_types.is_empty());
        assert!(doc.origins.is_empty());
        assert_eq!(doc.deprecated, None);
        assert_eq!(doc.last_updated, None);
        assert_eq!(doc.created_at, None);
        assert_eq!(doc.metadata, StructureMetadata::default());
    }

    #[test]
    fn missing_material_id_is_named() {
        let err = MaterialsDocument::from_fields(&fields(json!({"task_ids": ["mp-1"]})))
            .unwrap_err();
        assert_eq!(err.model, "MaterialsDocument");
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["material_id"]);
    }

    #[test]
    fn null_or_blank_material_id_is_rejected() {
        for value in [json!(null), json!(""), json!("  ")] {
            let err = MaterialsDocument::from_fields(&fields(json!({"material_id": value})))
                .unwrap_err();
            assert!(err.has_field("material_id"));
        }
    }

    #[test]
    fn identifier_convention_is_not_enforced() {
        let doc =
            MaterialsDocument::from_fields(&fields(json!({"material_id": "custom-abc"}))).unwrap();
        assert_eq!(doc.material_id(), "custom-abc");
    }

    #[test]
    fn all_type_errors_are_collected() {
        let err = MaterialsDocument::from_fields(&fields(json!({
            "material_id": "mp-1",
            "task_ids": ["mp-2", {"bad": true}],
            "deprecated": "sometimes",
            "created_at": "last tuesday",
            "task_types": {"mp-2": ["GGA"]},
            "origins": [{"property": "structure"}],
            "nsites": "eight",
            "initial_structures": null,
        })))
        .unwrap_err();
        let fields: Vec<&str> = err.fields().collect();
        for expected in [
            "task_ids.1",
            "deprecated",
            "created_at",
            "task_types.mp-2",
            "origins.0.task_type",
            "origins.0.task_id",
            "origins.0.last_update",
            "nsites",
            "initial_structures",
        ] {
            assert!(fields.contains(&expected), "missing {} in {:?}", expected, fields);
        }
    }

    #[test]
    fn coerces_loose_values() {
        let doc = MaterialsDocument::from_fields(&fields(json!({
            "material_id": "mp-1",
            "task_ids": [1, "mp-2"],
            "deprecated": "false",
            "last_updated": "2021-03-04 05:06:07",
            "created_at": 0,
        })))
        .unwrap();
        assert_eq!(doc.task_ids, vec!["1", "mp-2"]);
        assert_eq!(doc.deprecated, Some(false));
        assert_eq!(
            doc.last_updated,
            Some(Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap())
        );
        assert_eq!(doc.created_at.map(|t| t.timestamp()), Some(0));
    }

    #[test]
    fn unknown_fields_follow_policy() {
        let input = fields(json!({"material_id": "mp-1", "band_gap": 1.1}));
        assert!(MaterialsDocument::from_fields(&input).is_ok());

        let config = ValidationConfig {
            unknown_fields: UnknownFieldPolicy::Reject,
            ..ValidationConfig::default()
        };
        let err = MaterialsDocument::from_fields_with(&input, &config).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["band_gap"]);
    }

    #[test]
    fn task_references_are_opt_in() {
        let input = fields(json!({
            "material_id": "mp-1",
            "task_ids": ["mp-2"],
            "deprecated_tasks": ["mp-9"],
            "task_types": {"mp-2": "GGA Static", "mp-3": "GGA Static"},
        }));
        assert!(MaterialsDocument::from_fields(&input).is_ok());

        let config = ValidationConfig {
            enforce_task_references: true,
            ..ValidationConfig::default()
        };
        let err = MaterialsDocument::from_fields_with(&input, &config).unwrap_err();
        assert_eq!(
            err.fields().collect::<Vec<_>>(),
            vec!["task_types.mp-3", "deprecated_tasks.0"]
        );
    }

    #[test]
    fn origin_for_returns_latest_entry() {
        let t0 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let mut doc =
            MaterialsDocument::from_fields(&fields(json!({"material_id": "mp-1"}))).unwrap();
        doc.origins.push(PropertyOrigin::new("structure", "GGA Structure Optimization", "mp-2", t0));
        doc.origins.push(PropertyOrigin::new("band_gap", "GGA NSCF Line", "mp-3", t0));
        doc.origins.push(PropertyOrigin::new("structure", "R2SCAN Structure Optimization", "mp-4", t1));

        let origin = doc.origin_for("structure").unwrap();
        assert_eq!(origin.task_id(), "mp-4");
        assert_eq!(origin.last_update(), t1);
        assert!(doc.origin_for("magnetism").is_none());
    }

    #[test]
    fn encoded_form_is_flat_and_complete() {
        let mut doc = MaterialsDocument::from_fields(&fields(json!({
            "material_id": "mp-13",
            "formula_pretty": "Fe",
        })))
        .unwrap();
        doc.structure = Some(iron());
        let encoded = doc.to_fields().unwrap();
        assert_eq!(encoded["formula_pretty"], json!("Fe"));
        assert_eq!(encoded["initial_structures"], json!([]));
        assert_eq!(encoded["task_types"], json!({}));
        assert_eq!(encoded["deprecated"], Value::Null);
        assert!(!encoded.contains_key("metadata"));
        for name in MaterialsDocument::FIELDS.iter().chain(StructureMetadata::FIELDS) {
            assert!(encoded.contains_key(*name), "{} not encoded", name);
        }
        assert_eq!(MaterialsDocument::from_fields(&encoded).unwrap(), doc);
    }

    #[test]
    fn decoding_validates() {
        let err = serde_json::from_str::<MaterialsDocument>(r#"{"task_ids": []}"#).unwrap_err();
        assert!(err.to_string().contains("material_id"));
    }
}
