// crates/matdoc-core/src/provenance.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::{self, FieldMap, FieldReader};
use crate::error::{FieldError, ValidationError};

/// Records where the current value of one document property came from:
/// calculation `task_id` of type `task_type`, as of `last_update`.
///
/// Immutable once created. Decoding goes through `from_fields`, so every
/// instance carries all four fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldMap")]
pub struct PropertyOrigin {
    property: String,
    task_type: String,
    task_id: String,
    last_update: DateTime<Utc>,
}

impl PropertyOrigin {
    pub const MODEL: &'static str = "PropertyOrigin";

    pub fn new(
        property: impl Into<String>,
        task_type: impl Into<String>,
        task_id: impl Into<String>,
        last_update: DateTime<Utc>,
    ) -> Self {
        Self {
            property: property.into(),
            task_type: task_type.into(),
            task_id: task_id.into(),
            last_update,
        }
    }

    /// Validate a field map. Fails naming every missing or mistyped field.
    pub fn from_fields(fields: &FieldMap) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::new(fields);
        let property = reader.required("property", coerce::string);
        let task_type = reader.required("task_type", coerce::string);
        let task_id = reader.required("task_id", coerce::string);
        let last_update = reader.required("last_update", coerce::timestamp);
        reader.finish(Self::MODEL)?;
        Self::from_parts(property, task_type, task_id, last_update)
    }

    /// Assemble from individually coerced fields, naming each one that is unset.
    fn from_parts(
        property: Option<String>,
        task_type: Option<String>,
        task_id: Option<String>,
        last_update: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        let unset = [
            ("property", property.is_none()),
            ("task_type", task_type.is_none()),
            ("task_id", task_id.is_none()),
            ("last_update", last_update.is_none()),
        ];
        match (property, task_type, task_id, last_update) {
            (Some(property), Some(task_type), Some(task_id), Some(last_update)) => Ok(Self {
                property,
                task_type,
                task_id,
                last_update,
            }),
            _ => Err(ValidationError::new(
                Self::MODEL,
                unset
                    .iter()
                    .filter(|(_, missing)| *missing)
                    .map(|(name, _)| FieldError::missing(*name))
                    .collect(),
            )),
        }
    }

    /// The document property this entry covers.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Calculation type of the originating task.
    pub fn task_type(&self) -> &str {
        &self.task_type
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// When the originating calculation was last updated.
    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }
}

impl TryFrom<FieldMap> for PropertyOrigin {
    type Error = ValidationError;

    fn try_from(fields: FieldMap) -> Result<Self, Self::Error> {
        Self::from_fields(&fields)
    }
}

/// Coerce a nested value into a PropertyOrigin, keeping field locations.
pub(crate) fn coerce_origin(value: &Value) -> coerce::Coerced<PropertyOrigin> {
    match value {
        Value::Object(fields) => PropertyOrigin::from_fields(fields).map_err(|e| e.errors),
        _ => Err(vec![FieldError::new(
            String::new(),
            "value is not a valid dict",
        )]),
    }
}
