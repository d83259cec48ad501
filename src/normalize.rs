//! Field normalization for list-shaped API fields.
//!
//! Attrove returns attendee/participant lists in three shapes depending on
//! the source integration: a native JSON array, the same array serialized
//! into a JSON string, or nothing at all. `ListField` captures whatever
//! arrived; `to_list` turns it into a plain `Vec` and never fails.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// Maximum number of characters of a raw field echoed into a diagnostic.
pub const PREVIEW_CHARS: usize = 100;

/// A boundary field that should be a list but may not be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListField<T> {
    /// Already a native array.
    List(Vec<T>),
    /// The array serialized as text (`"[{\"email\":...}]"`).
    Encoded(String),
    /// `null` or absent.
    Missing,
    /// Anything else: a number, an object, or an array whose items don't fit `T`.
    Other(Value),
}

impl<T> Default for ListField<T> {
    fn default() -> Self {
        ListField::Missing
    }
}

impl<T> From<Vec<T>> for ListField<T> {
    fn from(items: Vec<T>) -> Self {
        ListField::List(items)
    }
}

impl<T: DeserializeOwned + Clone> ListField<T> {
    /// See [`to_list`].
    pub fn to_list(&self, sink: &dyn DiagnosticSink) -> Vec<T> {
        to_list(self, sink)
    }
}

/// Why an encoded list field could not be turned into items.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("{0}")]
    Syntax(serde_json::Error),
    #[error("expected array but got {0}")]
    NotAList(&'static str),
    #[error("{0}")]
    Items(serde_json::Error),
}

/// Decode the text form of a list field.
pub fn decode_list<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, DecodeError> {
    let parsed: Value = serde_json::from_str(raw).map_err(DecodeError::Syntax)?;
    match parsed {
        Value::Array(_) => serde_json::from_value(parsed).map_err(DecodeError::Items),
        other => Err(DecodeError::NotAList(json_type_name(&other))),
    }
}

/// Normalize a list field into a `Vec`.
///
/// Native lists come back unchanged. Malformed input degrades to an empty
/// list and one diagnostic on `sink`; missing input degrades silently.
pub fn to_list<T: DeserializeOwned + Clone>(
    field: &ListField<T>,
    sink: &dyn DiagnosticSink,
) -> Vec<T> {
    match field {
        ListField::List(items) => items.clone(),
        ListField::Missing => Vec::new(),
        ListField::Encoded(raw) => match decode_list(raw) {
            Ok(items) => items,
            Err(DecodeError::NotAList(found)) => {
                sink.emit(Diagnostic::FieldNotList {
                    found: found.to_string(),
                    preview: preview(raw),
                });
                Vec::new()
            }
            Err(DecodeError::Syntax(e)) | Err(DecodeError::Items(e)) => {
                sink.emit(Diagnostic::FieldUnparsable {
                    error: e.to_string(),
                    preview: preview(raw),
                });
                Vec::new()
            }
        },
        ListField::Other(value) => {
            let raw = value.to_string();
            match value {
                Value::Array(_) => {
                    let error = serde_json::from_value::<Vec<T>>(value.clone())
                        .err()
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "array items did not match".to_string());
                    sink.emit(Diagnostic::FieldUnparsable {
                        error,
                        preview: preview(&raw),
                    });
                }
                other => sink.emit(Diagnostic::FieldNotList {
                    found: json_type_name(other).to_string(),
                    preview: preview(&raw),
                }),
            }
            Vec::new()
        }
    }
}

/// First `PREVIEW_CHARS` characters of a raw value.
pub fn preview(raw: &str) -> String {
    raw.chars().take(PREVIEW_CHARS).collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
