//! Field normalization shared by tenders and bids.

use thiserror::Error;

/// Maximum length of a tender or bid name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a tender or bid description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A single invalid input field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    /// Required field is missing or blank.
    #[error("{field} must not be empty")]
    Empty {
        /// Field name as exposed to clients.
        field: &'static str,
    },

    /// Field exceeds its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name as exposed to clients.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
}

/// Trims a required text field and enforces its length.
pub fn normalize_required(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Empty { field });
    }
    check_len(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Trims an optional text field. Blank input becomes `None`.
pub fn normalize_optional(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, FieldError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => {
            check_len(field, trimmed, max)?;
            Ok(Some(trimmed.to_string()))
        }
    }
}

/// Normalizes a name field.
pub fn normalize_name(value: &str) -> Result<String, FieldError> {
    normalize_required("name", value, MAX_NAME_LEN)
}

/// Normalizes a description field.
pub fn normalize_description(value: Option<&str>) -> Result<Option<String>, FieldError> {
    normalize_optional("description", value, MAX_DESCRIPTION_LEN)
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    if value.chars().count() > max {
        return Err(FieldError::TooLong { field, max });
    }
    Ok(())
}
