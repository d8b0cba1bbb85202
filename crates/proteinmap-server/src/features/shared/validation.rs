//! Shared validation utilities
//!
//! Validation never short-circuits: every problem found in a submission is
//! recorded in a [`FieldErrors`] map keyed by the wire field name, so a client
//! sees all of them at once.
//!
//! # Examples
//!
//! ```rust,ignore
//! use proteinmap_server::features::shared::validation::{validate_text, FieldErrors};
//!
//! let mut errors = FieldErrors::new();
//! if let Err(e) = validate_text("", 12) {
//!     errors.add("protein_id", e);
//! }
//! assert!(errors.contains("protein_id"));
//! ```

use proteinmap_common::AminoAcidAlphabet;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Message used for any structurally required field that is absent
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Key for problems that belong to the body as a whole
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Field name to the ordered list of problems found for it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map holding a single message
    pub fn single(field: impl Into<String>, message: impl ToString) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record a problem for `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl ToString) {
        self.0
            .entry(field.into())
            .or_default()
            .push(message.to_string());
    }

    /// Record that `field` was absent
    pub fn required(&mut self, field: impl Into<String>) {
        self.add(field, REQUIRED_MESSAGE);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for `field`, in the order they were added
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(value)` when nothing was recorded, otherwise the collected errors
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.0).unwrap_or(serde_json::Value::Null)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Errors that can occur during free-text validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextValidationError {
    #[error("This field may not be blank.")]
    Blank,

    #[error("Ensure this field has no more than {max_length} characters.")]
    TooLong { max_length: usize },
}

/// Validate a required text value
///
/// # Rules
/// - Must contain at least one non-whitespace character
/// - Must not exceed `max_length` characters (not bytes)
pub fn validate_text(value: &str, max_length: usize) -> Result<(), TextValidationError> {
    if value.trim().is_empty() {
        return Err(TextValidationError::Blank);
    }

    if value.chars().count() > max_length {
        return Err(TextValidationError::TooLong { max_length });
    }

    Ok(())
}

/// Errors that can occur during sequence validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceValidationError {
    #[error("Ensure this field has no more than {max_length} characters.")]
    TooLong { max_length: usize },

    #[error("Sequence contains invalid amino acids")]
    InvalidResidues(Vec<char>),
}

/// Validate an amino-acid sequence against the configured alphabet
///
/// The empty sequence is valid.
pub fn validate_sequence(
    sequence: &str,
    alphabet: &AminoAcidAlphabet,
    max_length: usize,
) -> Result<(), SequenceValidationError> {
    if sequence.chars().count() > max_length {
        return Err(SequenceValidationError::TooLong { max_length });
    }

    let invalid = alphabet.invalid_residues(sequence);
    if !invalid.is_empty() {
        return Err(SequenceValidationError::InvalidResidues(invalid));
    }

    Ok(())
}

/// A JSON value of the wrong kind for its field
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum JsonTypeError {
    #[error("A valid integer is required.")]
    NotAnInteger,

    #[error("Not a valid string.")]
    NotAString,

    #[error("Invalid data. Expected an object.")]
    NotAnObject,

    #[error("Expected a list of items.")]
    NotAList,
}

// Each reader maps `null` to `None` so absent and null fields look the same
// to the required-field checks that run afterwards.

/// Read a 32-bit integer; numeric strings such as `"42"` are accepted
pub fn json_integer(value: &Value) -> Result<Option<i32>, JsonTypeError> {
    let parsed = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.map(Some).ok_or(JsonTypeError::NotAnInteger)
}

/// Read a string; numbers are accepted in their JSON spelling
pub fn json_string(value: &Value) -> Result<Option<String>, JsonTypeError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(JsonTypeError::NotAString),
    }
}

pub fn json_object(value: &Value) -> Result<Option<&Map<String, Value>>, JsonTypeError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        _ => Err(JsonTypeError::NotAnObject),
    }
}

pub fn json_list(value: &Value) -> Result<Option<&[Value]>, JsonTypeError> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => Ok(Some(items.as_slice())),
        _ => Err(JsonTypeError::NotAList),
    }
}
