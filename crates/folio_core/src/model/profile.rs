//! Site owner profile shown in the hero section.

use super::{check_email, now_epoch_ms, require_text, EntityId, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: EntityId,
    pub full_name: String,
    /// Comma-separated role titles.
    pub roles: String,
    pub tagline: String,
    pub location: String,
    pub phone: String,
    pub email: String,
    /// Object-store URL of the uploaded portrait.
    pub image_url: Option<String>,
    pub updated_at: i64,
}

impl Profile {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
            roles: String::new(),
            tagline: String::new(),
            location: String::new(),
            phone: String::new(),
            email: email.into(),
            image_url: None,
            updated_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("full_name", &self.full_name)?;
        check_email("email", &self.email)
    }

    /// Role titles split on commas, blanks dropped.
    pub fn role_list(&self) -> Vec<String> {
        self.roles
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(str::to_string)
            .collect()
    }
}
