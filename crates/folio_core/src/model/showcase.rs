//! Skills, certificates and projects listed on the public page.
//!
//! # Invariants
//! - Skills render in ascending `display_order`.
//! - Required form fields are validated before persistence.

use super::{now_epoch_ms, require_text, EntityId, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub display_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Skill {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        display_order: i64,
    ) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            display_order,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("category", &self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: EntityId,
    pub title: String,
    pub organization: String,
    /// Free-text year as entered ("2023", "2022-2023").
    pub year: String,
    pub description: String,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    pub created_at: i64,
}

impl Certificate {
    pub fn new(
        title: impl Into<String>,
        organization: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            organization: organization.into(),
            year: year.into(),
            description: String::new(),
            file_name: None,
            file_url: None,
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("organization", &self.organization)?;
        require_text("year", &self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub role: String,
    /// Comma-separated tool list.
    pub tools: String,
    pub description: String,
    pub impact: String,
    pub image_url: Option<String>,
    pub created_at: i64,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            role: role.into(),
            tools: String::new(),
            description: description.into(),
            impact: String::new(),
            image_url: None,
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("role", &self.role)?;
        require_text("description", &self.description)
    }

    pub fn tool_list(&self) -> Vec<String> {
        self.tools
            .split(',')
            .map(str::trim)
            .filter(|tool| !tool.is_empty())
            .map(str::to_string)
            .collect()
    }
}
