//! Site content domain model.
//!
//! # Responsibility
//! - Define the records persisted by the content store.
//! - Own field-level validation that runs before any write.
//!
//! # Invariants
//! - Every record is identified by a stable `EntityId`.
//! - Timestamps are Unix epoch milliseconds.
//! - Invalid input is rejected with `ValidationError` and never persisted.

pub mod analytics;
pub mod bio;
pub mod contact;
pub mod portfolio;
pub mod profile;
pub mod showcase;

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

/// Stable identifier shared by every persisted record.
pub type EntityId = Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Field-level validation failure raised before a record reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid `{field}`: {reason}")]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable reason.
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

pub(crate) fn check_max_chars(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > max_chars {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max_chars} characters"),
        ));
    }
    Ok(())
}

pub(crate) fn check_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(ValidationError::new(field, "must be a valid email address"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_email, check_max_chars, require_text};

    #[test]
    fn require_text_rejects_whitespace_only() {
        let err = require_text("name", "   \n").unwrap_err();
        assert_eq!(err.field, "name");
        assert!(require_text("name", " Ada ").is_ok());
    }

    #[test]
    fn check_max_chars_counts_characters_not_bytes() {
        assert!(check_max_chars("subject", "ééé", 3).is_ok());
        assert!(check_max_chars("subject", "éééé", 3).is_err());
    }

    #[test]
    fn check_email_accepts_plain_addresses_only() {
        assert!(check_email("email", "owner@example.com").is_ok());
        assert!(check_email("email", " owner@example.com ").is_ok());
        assert!(check_email("email", "owner@example").is_err());
        assert!(check_email("email", "not an email").is_err());
    }
}
