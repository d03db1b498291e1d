//! Structural violation reporting shared by the per-platform validators.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One structural problem found while validating an export, located by JSON path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Collects violations while a validator walks the raw export.
#[derive(Debug, Default)]
pub(crate) struct Violations {
    items: Vec<SchemaViolation>,
}

impl Violations {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.items.push(SchemaViolation {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Decodes `value` into `T`, recording the serde error at `path` on failure.
    pub(crate) fn decode<T: DeserializeOwned>(&mut self, value: &Value, path: &str) -> Option<T> {
        match T::deserialize(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                self.push(path, e.to_string());
                None
            }
        }
    }

    /// Returns the array at `key` of `object`, recording a violation if it is missing.
    pub(crate) fn require_array<'v>(
        &mut self,
        object: &'v Value,
        key: &str,
        path: &str,
    ) -> Option<&'v Vec<Value>> {
        match object.get(key) {
            Some(Value::Array(items)) => Some(items),
            Some(other) => {
                self.push(
                    join(path, key),
                    format!("expected an array, found {}", kind_of(other)),
                );
                None
            }
            None => {
                self.push(join(path, key), "missing required array");
                None
            }
        }
    }

    /// `Ok(value)` when nothing was recorded, otherwise every violation.
    pub(crate) fn finish<T>(self, value: T) -> Result<T, Vec<SchemaViolation>> {
        if self.items.is_empty() {
            Ok(value)
        } else {
            Err(self.items)
        }
    }
}

/// Appends an object key to a JSON path.
pub(crate) fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Appends an array index to a JSON path.
pub(crate) fn index(path: &str, i: usize) -> String {
    format!("{}[{}]", path, i)
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// True if `root[key]` exists and is an array.
pub(crate) fn has_array(root: &Value, key: &str) -> bool {
    root.get(key).is_some_and(Value::is_array)
}
