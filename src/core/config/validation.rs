//! Validation helper functions for configuration types.

use crate::core::errors::{Result, ThreadFactoryError};

/// Validate that a string value is not empty.
pub fn validate_non_empty(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ThreadFactoryError::validation(
            format!("{} must not be empty", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that a value can be used in an OS thread name.
///
/// Thread names are handed to the OS as C strings, so interior NUL bytes are rejected.
pub fn validate_thread_name_part(value: &str, field: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(ThreadFactoryError::validation(
            format!("{} must not contain NUL bytes", field),
            field,
        ));
    }
    Ok(())
}

/// Validate an optional name part, accepting `None`.
pub fn validate_optional_name_part(value: Option<&str>, field: &str) -> Result<()> {
    match value {
        Some(value) => validate_thread_name_part(value, field),
        None => Ok(()),
    }
}
