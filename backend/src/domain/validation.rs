//! Field-level validation shared by bootcamp, course and review inputs.

use serde_json::json;

use super::Error;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Required field absent or blank.
    #[error("please add a {field}")]
    Missing { field: &'static str },
    /// Field longer than allowed.
    #[error("{field} can not be more than {max} characters")]
    TooLong { field: &'static str, max: usize },
    /// Field present but malformed.
    #[error("{field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl FieldError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::TooLong { field, .. } | Self::Invalid { field, .. } => {
                field
            }
        }
    }

    /// Machine-readable reason used in error details.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing",
            Self::TooLong { .. } => "too_long",
            Self::Invalid { .. } => "invalid",
        }
    }
}

impl From<FieldError> for Error {
    fn from(value: FieldError) -> Self {
        Error::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field(), "code": value.reason() }))
    }
}

/// Trimmed, non-empty text no longer than `max` characters.
pub fn required_text(field: &'static str, raw: Option<&str>, max: usize) -> Result<String, FieldError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(FieldError::Missing { field });
    }
    if trimmed.chars().count() > max {
        return Err(FieldError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Like [`required_text`] but absent or blank input yields `None`.
pub fn optional_text(
    field: &'static str,
    raw: Option<&str>,
    max: usize,
) -> Result<Option<String>, FieldError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => required_text(field, Some(value), max).map(Some),
    }
}
