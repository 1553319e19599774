//! Field-level input validators shared by the write endpoints.
//!
//! Each validator returns [`CoreError::FieldValidation`] naming the offending
//! field so the API layer can report it.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Require a non-blank string no longer than `max_len` characters.
pub fn validate_required_text(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::field(field, "This field may not be blank."));
    }
    validate_max_length(field, Some(value), max_len)
}

/// Reject strings longer than `max_len` characters. `None` passes.
pub fn validate_max_length(
    field: &'static str,
    value: Option<&str>,
    max_len: usize,
) -> Result<(), CoreError> {
    match value {
        Some(v) if v.chars().count() > max_len => Err(CoreError::field(
            field,
            format!("Ensure this field has no more than {max_len} characters."),
        )),
        _ => Ok(()),
    }
}

/// Largest accepted story point estimate or task count.
///
/// Matches the `CHECK` constraints on the `tasks` and `team_members` tables.
pub const MAX_COUNT: i64 = 2_147_483_647;

/// Require a count or story point estimate in `0..=MAX_COUNT`. `None` passes.
pub fn validate_count(field: &'static str, value: Option<i64>) -> Result<(), CoreError> {
    match value {
        Some(v) if v < 0 => Err(CoreError::field(
            field,
            "Ensure this value is greater than or equal to 0.",
        )),
        Some(v) if v > MAX_COUNT => Err(CoreError::field(
            field,
            format!("Ensure this value is less than or equal to {MAX_COUNT}."),
        )),
        _ => Ok(()),
    }
}

/// Require a syntactically valid email address.
pub fn validate_email(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.validate_email() {
        Ok(())
    } else {
        Err(CoreError::field(field, "Enter a valid email address."))
    }
}
