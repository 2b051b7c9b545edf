// crates/matdoc-core/src/config.rs
//
// Validation rules that go beyond field presence and type.
// Deserializable so binaries can embed it in their own TOML configuration.

use serde::{Deserialize, Serialize};

/// What to do with keys that name no document or metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Drop the key (logged at debug level).
    #[default]
    Ignore,
    /// Fail validation, naming the key.
    Reject,
}

/// Configuration for document validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Require every `task_types` key and every `deprecated_tasks` entry to
    /// appear in `task_ids`.
    pub enforce_task_references: bool,

    /// Handling of unrecognized keys.
    pub unknown_fields: UnknownFieldPolicy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enforce_task_references: false,
            unknown_fields: UnknownFieldPolicy::Ignore,
        }
    }
}

impl ValidationConfig {
    /// All optional checks enabled.
    pub fn strict() -> Self {
        Self {
            enforce_task_references: true,
            unknown_fields: UnknownFieldPolicy::Reject,
        }
    }
}
