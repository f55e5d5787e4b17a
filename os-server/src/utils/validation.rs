//! Input validation helpers
//!
//! Centralized text length constants and validation functions, called
//! from handlers before any business logic runs.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: company, store, client, service names
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, pause reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, documents, instance names
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs (provider endpoints)
pub const MAX_URL_LEN: usize = 2048;

/// Template bodies
pub const MAX_TEMPLATE_LEN: usize = 4000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_text_rejected() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Loja Centro", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn oversized_optional_text_rejected() {
        let long = Some("x".repeat(MAX_NOTE_LEN + 1));
        assert!(validate_optional_text(&long, "reason", MAX_NOTE_LEN).is_err());
        assert!(validate_optional_text(&None, "reason", MAX_NOTE_LEN).is_ok());
    }
}
