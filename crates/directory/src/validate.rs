//! Field validation shared by payload constructors.
//!
//! Lengths are counted in characters, not bytes.

use workforce_core::{AppError, AppResult};

/// Require `value` to be non-empty and within `min..=max` characters.
pub fn required_len(field: &str, value: &str, min: usize, max: usize) -> AppResult<String> {
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    check_len(field, value, min, max)?;
    Ok(value.to_owned())
}

/// Validate an optional patch value: absent or empty passes untouched.
pub fn optional_len(field: &str, value: Option<&str>, min: usize, max: usize) -> AppResult<Option<String>> {
    match value {
        Some(v) if !v.is_empty() => {
            check_len(field, v, min, max)?;
            Ok(Some(v.to_owned()))
        }
        other => Ok(other.map(str::to_owned)),
    }
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::bad_request(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

/// Structural email check: `local@domain.tld`, no whitespace, at most 255 characters.
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.chars().count() > 255 || value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

pub fn email(field: &str, value: &str) -> AppResult<String> {
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    if !is_valid_email(value) {
        return Err(AppError::bad_request(format!("{field} must be a valid email")));
    }
    Ok(value.to_owned())
}
