//! Contact form submissions and their inbox read state.
//!
//! # Responsibility
//! - Validate public contact-form input before it is stored.
//! - Define the inbox record flipped by the dashboard.
//!
//! # Invariants
//! - Stored submission fields are trimmed.
//! - New submissions start unread.

use super::{check_email, check_max_chars, now_epoch_ms, require_text, EntityId, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const SUBJECT_MAX_CHARS: usize = 200;
pub const MESSAGE_MAX_CHARS: usize = 2000;

/// Raw contact-form input as typed by a visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    /// Validates trimmed values against the contact form limits.
    ///
    /// Fields are checked in form order; the first failure is returned.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = self.name.trim();
        require_text("name", name)?;
        check_max_chars("name", name, NAME_MAX_CHARS)?;

        let email = self.email.trim();
        check_email("email", email)?;
        check_max_chars("email", email, EMAIL_MAX_CHARS)?;

        let subject = self.subject.trim();
        require_text("subject", subject)?;
        check_max_chars("subject", subject, SUBJECT_MAX_CHARS)?;

        let message = self.message.trim();
        require_text("message", message)?;
        check_max_chars("message", message, MESSAGE_MAX_CHARS)?;
        Ok(())
    }

    /// Converts validated input into an unread inbox record.
    pub fn into_message(self) -> Result<ContactMessage, ValidationError> {
        self.validate()?;
        Ok(ContactMessage {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
            is_read: false,
            created_at: now_epoch_ms(),
        })
    }
}

/// Inbox record backed by `contact_submissions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: i64,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ContactSubmission {
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
        }
        .validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactSubmission, MESSAGE_MAX_CHARS};

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "  Jane Smith ".to_string(),
            email: "jane@company.com".to_string(),
            subject: "Internship Opportunity".to_string(),
            message: "We have a position available.\n".to_string(),
        }
    }

    #[test]
    fn into_message_trims_fields_and_starts_unread() {
        let message = submission().into_message().unwrap();
        assert_eq!(message.name, "Jane Smith");
        assert_eq!(message.message, "We have a position available.");
        assert!(!message.is_read);
    }

    #[test]
    fn blank_subject_is_rejected() {
        let mut input = submission();
        input.subject = "   ".to_string();
        let err = input.validate().unwrap_err();
        assert_eq!(err.field, "subject");
    }

    #[test]
    fn invalid_email_is_rejected_before_later_fields() {
        let mut input = submission();
        input.email = "jane at company".to_string();
        input.message = String::new();
        let err = input.validate().unwrap_err();
        assert_eq!(err.field, "email");
    }

    #[test]
    fn overlong_message_is_rejected() {
        let mut input = submission();
        input.message = "x".repeat(MESSAGE_MAX_CHARS + 1);
        let err = input.validate().unwrap_err();
        assert_eq!(err.field, "message");
    }
}
