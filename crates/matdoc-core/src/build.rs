// crates/matdoc-core/src/build.rs
//
// The build operation: structure + identifier + overrides -> validated document.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::coerce::FieldMap;
use crate::config::ValidationConfig;
use crate::error::{BuildError, DerivationError, FieldError, ValidationError};
use crate::material::MaterialsDocument;
use crate::structure::Structure;
use crate::traits::StructureMetadataDeriver;

/// Builds materials documents with a fixed deriver and validation config.
///
/// Stateless between calls; a single builder can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder<D> {
    deriver: D,
    config: ValidationConfig,
}

impl<D: StructureMetadataDeriver> DocumentBuilder<D> {
    pub fn new(deriver: D) -> Self {
        Self {
            deriver,
            config: ValidationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn deriver(&self) -> &D {
        &self.deriver
    }

    /// Build a document from the minimal inputs.
    ///
    /// 1. Derive metadata from `structure`; derivation errors propagate as-is.
    /// 2. Start from the derived fields plus `structure` itself, then apply
    ///    `overrides` on top. An override always wins over a derived value.
    /// 3. `last_updated` and `created_at` are set to the current time only
    ///    when the key is absent from the merged fields. An explicit `null`
    ///    counts as present and is kept.
    /// 4. `material_id` is the given identifier; a `material_id` key in the
    ///    overrides is ignored.
    /// 5. The merged fields are validated as a whole.
    pub fn build(
        &self,
        structure: &Structure,
        material_id: &str,
        overrides: FieldMap,
    ) -> Result<MaterialsDocument, BuildError> {
        let metadata = self.deriver.derive(structure)?;

        let mut fields = match serde_json::to_value(&metadata) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => FieldMap::new(),
            Err(e) => {
                return Err(DerivationError::Failed(format!("unencodable metadata: {}", e)).into())
            }
        };
        fields.insert("structure".to_string(), encode("structure", structure)?);

        for (key, value) in overrides {
            if key == "material_id" {
                tracing::debug!(
                    material_id,
                    "ignoring material_id override in favour of the explicit identifier"
                );
                continue;
            }
            fields.insert(key, value);
        }

        let now = Utc::now();
        for key in ["last_updated", "created_at"] {
            if !fields.contains_key(key) {
                tracing::debug!(material_id, field = key, %now, "defaulting timestamp");
                fields.insert(key.to_string(), encode(key, &now)?);
            }
        }

        fields.insert(
            "material_id".to_string(),
            Value::String(material_id.to_string()),
        );

        let doc = MaterialsDocument::from_fields_with(&fields, &self.config)?;
        tracing::debug!(
            material_id = doc.material_id(),
            formula = doc.metadata.formula_pretty.as_deref().unwrap_or("?"),
            "built materials document"
        );
        Ok(doc)
    }
}

fn encode<T: Serialize>(field: &str, value: &T) -> Result<Value, ValidationError> {
    serde_json::to_value(value).map_err(|e| {
        ValidationError::new(
            MaterialsDocument::MODEL,
            vec![FieldError::new(field, e.to_string())],
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnknownFieldPolicy;
    use crate::element::Element;
    use crate::metadata::StructureMetadata;
    use crate::structure::{Lattice, Site};
    use chrono::TimeZone;
    use serde_json::json;

    struct FailingDeriver;

    impl StructureMetadataDeriver for FailingDeriver {
        fn derive(&self, _: &Structure) -> Result<StructureMetadata, DerivationError> {
            Err(DerivationError::Failed("symmetry finder crashed".to_string()))
        }
    }

    struct FixedDeriver;

    impl StructureMetadataDeriver for FixedDeriver {
        fn derive(&self, _: &Structure) -> Result<StructureMetadata, DerivationError> {
            Ok(StructureMetadata {
                formula_pretty: Some("Derived".to_string()),
                nsites: Some(1),
                ..StructureMetadata::default()
            })
        }
    }

    fn overrides(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn copper() -> Structure {
        Structure::new(
            Lattice::cubic(3.61),
            vec![
                Site::new(Element::Cu, [0.0, 0.0, 0.0]),
                Site::new(Element::Cu, [0.5, 0.5, 0.0]),
                Site::new(Element::Cu, [0.5, 0.0, 0.5]),
                Site::new(Element::Cu, [0.0, 0.5, 0.5]),
            ],
        )
    }

    #[test]
    fn derivation_failure_propagates_unchanged() {
        let err = DocumentBuilder::new(FailingDeriver)
            .build(&copper(), "mp-30", FieldMap::new())
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::Derivation(DerivationError::Failed("symmetry finder crashed".to_string()))
        );
    }

    #[test]
    fn overrides_win_over_derived_values() {
        let doc = DocumentBuilder::new(FixedDeriver)
            .build(&copper(), "mp-30", overrides(json!({"formula_pretty": "Cu"})))
            .unwrap();
        assert_eq!(doc.metadata.formula_pretty.as_deref(), Some("Cu"));
        assert_eq!(doc.metadata.nsites, Some(1));
    }

    #[test]
    fn explicit_null_timestamps_are_kept() {
        let doc = DocumentBuilder::new(FixedDeriver)
            .build(
                &copper(),
                "mp-30",
                overrides(json!({"last_updated": null, "created_at": null})),
            )
            .unwrap();
        assert_eq!(doc.last_updated, None);
        assert_eq!(doc.created_at, None);
    }

    #[test]
    fn one_explicit_timestamp_leaves_the_other_defaulted() {
        let created = Utc.with_ymd_and_hms(2019, 5, 6, 7, 8, 9).unwrap();
        let before = Utc::now();
        let doc = DocumentBuilder::new(FixedDeriver)
            .build(
                &copper(),
                "mp-30",
                overrides(json!({"created_at": created.to_rfc3339()})),
            )
            .unwrap();
        let after = Utc::now();
        assert_eq!(doc.created_at, Some(created));
        let updated = doc.last_updated.unwrap();
        assert!(before <= updated && updated <= after);
    }

    #[test]
    fn material_id_override_is_ignored() {
        let doc = DocumentBuilder::new(FixedDeriver)
            .build(&copper(), "mp-30", overrides(json!({"material_id": "mp-999"})))
            .unwrap();
        assert_eq!(doc.material_id(), "mp-30");
    }

    #[test]
    fn bad_override_type_fails_validation() {
        let err = DocumentBuilder::new(FixedDeriver)
            .build(&copper(), "mp-30", overrides(json!({"task_ids": "mp-1"})))
            .unwrap_err();
        match err {
            BuildError::Validation(e) => assert!(e.has_field("task_ids")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn empty_identifier_fails_validation() {
        let err = DocumentBuilder::new(FixedDeriver)
            .build(&copper(), "", FieldMap::new())
            .unwrap_err();
        assert!(matches!(err, BuildError::Validation(ref e) if e.has_field("material_id")));
    }

    #[test]
    fn builder_config_applies() {
        let builder = DocumentBuilder::new(FixedDeriver).with_config(ValidationConfig {
            unknown_fields: UnknownFieldPolicy::Reject,
            ..ValidationConfig::default()
        });
        assert_eq!(builder.config().unknown_fields, UnknownFieldPolicy::Reject);
        let err = builder
            .build(&copper(), "mp-30", overrides(json!({"bandgap": 0.0})))
            .unwrap_err();
        assert!(matches!(err, BuildError::Validation(ref e) if e.has_field("bandgap")));
    }

    #[test]
    fn structure_is_stored_and_input_untouched() {
        let input = copper();
        let snapshot = input.clone();
        let doc = DocumentBuilder::new(FixedDeriver)
            .build(&input, "mp-30", FieldMap::new())
            .unwrap();
        assert_eq!(doc.structure.as_ref(), Some(&input));
        assert_eq!(input, snapshot);
    }
}
