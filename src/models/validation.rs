//! Field validation shared by the record models
//!
//! Text fields are stored in comma-delimited, line-oriented files, so they
//! must not contain the delimiter or line breaks. Length limits are in bytes.

use crate::error::LibrisError;

pub const TITLE_MAX: usize = 99;
pub const AUTHOR_MAX: usize = 49;
pub const CATEGORY_MAX: usize = 29;
pub const NAME_MAX: usize = 49;
pub const EMAIL_MAX: usize = 99;
pub const OBFUSCATED_PASSWORD_MAX: usize = 255;

/// Trim and check a required text field, returning the cleaned value
pub fn clean_text(field: &'static str, value: &str, max: usize) -> Result<String, LibrisError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(LibrisError::Validation(format!("{} cannot be empty", field)));
    }

    check_text(field, value, max)?;
    Ok(value.to_string())
}

/// Check an already-cleaned text field without modifying it
pub fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), LibrisError> {
    if value.len() > max {
        return Err(LibrisError::Validation(format!(
            "{} is too long ({} bytes, max {})",
            field,
            value.len(),
            max
        )));
    }

    if value.contains([',', '\n', '\r']) {
        return Err(LibrisError::Validation(format!(
            "{} cannot contain commas or line breaks",
            field
        )));
    }

    Ok(())
}
