//! Validation errors for NOTAM field input.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Which NOTAM form field failed validation.
///
/// Names match the form/YAML keys so the web layer can attach the error to
/// the right input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    Ident,
    Lat,
    Lon,
    Rad,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Ident => "ident",
            FieldName::Lat => "lat",
            FieldName::Lon => "lon",
            FieldName::Rad => "rad",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single malformed NOTAM field.
///
/// Validation is all-or-nothing: the first failing field aborts the parse
/// and nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: FieldName,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: FieldName, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
