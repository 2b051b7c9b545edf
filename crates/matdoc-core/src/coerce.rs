// crates/matdoc-core/src/coerce.rs
//
// Field-level coercion from loosely typed field maps into typed values.
//
// Every coercion returns its errors with locations relative to the value
// being coerced; FieldReader prefixes them with the field name.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{FieldError, ValidationError};

/// Loosely typed field mapping, as produced by a JSON object.
pub type FieldMap = serde_json::Map<String, Value>;

pub(crate) type Coerced<T> = Result<T, Vec<FieldError>>;

fn invalid<T>(message: impl Into<String>) -> Coerced<T> {
    Err(vec![FieldError::new(String::new(), message)])
}

/// Strings, or numbers rendered as their decimal text.
pub(crate) fn string(value: &Value) -> Coerced<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => invalid("str type expected"),
    }
}

pub(crate) fn non_empty_string(value: &Value) -> Coerced<String> {
    let s = string(value)?;
    if s.trim().is_empty() {
        return invalid("ensure this value is not empty");
    }
    Ok(s)
}

pub(crate) fn boolean(value: &Value) -> Coerced<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => invalid("value could not be parsed to a boolean"),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "on" | "t" | "true" | "y" | "yes" => Ok(true),
            "0" | "off" | "f" | "false" | "n" | "no" => Ok(false),
            _ => invalid("value could not be parsed to a boolean"),
        },
        _ => invalid("value could not be parsed to a boolean"),
    }
}

/// RFC 3339 text, naive ISO-8601 text read as UTC, or Unix seconds.
pub(crate) fn timestamp(value: &Value) -> Coerced<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s.trim())
            .map_or_else(|| invalid(format!("invalid datetime format: '{}'", s)), Ok),
        Value::Number(n) => {
            let parsed = match n.as_i64() {
                Some(secs) => DateTime::from_timestamp(secs, 0),
                None => n.as_f64().and_then(|f| {
                    let secs = f.floor();
                    let nanos = ((f - secs) * 1e9).round() as u32;
                    DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
                }),
            };
            parsed.map_or_else(|| invalid("timestamp out of range"), Ok)
        }
        _ => invalid("invalid datetime format"),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Signed years outside 0000-9999, as chrono's serde writes them.
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Some(dt);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// `null` means unset; anything else goes through `inner`.
pub(crate) fn nullable<T>(
    value: &Value,
    inner: impl FnOnce(&Value) -> Coerced<T>,
) -> Coerced<Option<T>> {
    match value {
        Value::Null => Ok(None),
        other => inner(other).map(Some),
    }
}

/// Array of values, each coerced by `item`; errors are located by index.
pub(crate) fn list<T>(value: &Value, item: impl Fn(&Value) -> Coerced<T>) -> Coerced<Vec<T>> {
    let Value::Array(values) = value else {
        return invalid("value is not a valid list");
    };
    let mut out = Vec::with_capacity(values.len());
    let mut errors = Vec::new();
    for (i, v) in values.iter().enumerate() {
        match item(v) {
            Ok(x) => out.push(x),
            Err(errs) => {
                let idx = i.to_string();
                errors.extend(errs.into_iter().map(|e| e.within(&idx)));
            }
        }
    }
    if errors.is_empty() {
        Ok(out)
    } else {
        Err(errors)
    }
}

/// Object of string values; errors are located by key.
pub(crate) fn string_map(value: &Value) -> Coerced<BTreeMap<String, String>> {
    let Value::Object(entries) = value else {
        return invalid("value is not a valid dict");
    };
    let mut out = BTreeMap::new();
    let mut errors = Vec::new();
    for (k, v) in entries {
        match string(v) {
            Ok(s) => {
                out.insert(k.clone(), s);
            }
            Err(errs) => errors.extend(errs.into_iter().map(|e| e.within(k))),
        }
    }
    if errors.is_empty() {
        Ok(out)
    } else {
        Err(errors)
    }
}

/// Decode through serde, for nested types with their own schema.
pub(crate) fn decode<T: DeserializeOwned>(value: &Value) -> Coerced<T> {
    serde_json::from_value(value.clone()).or_else(|e| invalid(e.to_string()))
}

/// Reads typed fields out of a FieldMap, collecting every error.
pub(crate) struct FieldReader<'a> {
    fields: &'a FieldMap,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(fields: &'a FieldMap) -> Self {
        Self {
            fields,
            errors: Vec::new(),
        }
    }

    fn record<T>(&mut self, name: &str, result: Coerced<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(errs) => {
                self.errors.extend(errs.into_iter().map(|e| e.within(name)));
                None
            }
        }
    }

    /// A field that must be present and not null.
    pub(crate) fn required<T>(
        &mut self,
        name: &str,
        coerce: impl FnOnce(&Value) -> Coerced<T>,
    ) -> Option<T> {
        match self.fields.get(name) {
            None | Some(Value::Null) => {
                self.errors.push(FieldError::missing(name));
                None
            }
            Some(v) => {
                let result = coerce(v);
                self.record(name, result)
            }
        }
    }

    /// A field that may be absent or null.
    pub(crate) fn optional<T>(
        &mut self,
        name: &str,
        coerce: impl FnOnce(&Value) -> Coerced<T>,
    ) -> Option<T> {
        match self.fields.get(name) {
            None => None,
            Some(v) => {
                let result = nullable(v, coerce);
                self.record(name, result).flatten()
            }
        }
    }

    /// A field that takes a fresh default when absent. Null is a type error.
    pub(crate) fn or_default<T: Default>(
        &mut self,
        name: &str,
        coerce: impl FnOnce(&Value) -> Coerced<T>,
    ) -> T {
        match self.fields.get(name) {
            None => T::default(),
            Some(v) => {
                let result = coerce(v);
                self.record(name, result).unwrap_or_default()
            }
        }
    }

    /// Decode the subset of `names` present in the map as one flattened
    /// record. Each present key is checked on its own first so that a bad
    /// value is reported under its own name.
    pub(crate) fn flattened<T: DeserializeOwned + Default>(&mut self, names: &[&str]) -> T {
        let mut subset = FieldMap::new();
        let mut failed = false;
        for name in names {
            let Some(value) = self.fields.get(*name) else {
                continue;
            };
            let mut single = FieldMap::new();
            single.insert(name.to_string(), value.clone());
            match serde_json::from_value::<T>(Value::Object(single)) {
                Ok(_) => {
                    subset.insert(name.to_string(), value.clone());
                }
                Err(e) => {
                    failed = true;
                    self.errors.push(FieldError::new(*name, e.to_string()));
                }
            }
        }
        if failed {
            return T::default();
        }
        // Every key decoded alone; a joint failure is reported under the
        // first present key.
        let first = subset.keys().next().cloned().unwrap_or_default();
        let result = decode(&Value::Object(subset));
        self.record(&first, result).unwrap_or_default()
    }

    pub(crate) fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub(crate) fn finish(self, model: &'static str) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(model, self.errors))
        }
    }
}
