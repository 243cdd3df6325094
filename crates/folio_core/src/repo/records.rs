//! `Entity` table mappings for every site content record.

use super::entity_repo::{
    bool_value, optional_text, parse_bool, parse_id, text, Entity, ListOrder, RepoError,
    RepoResult,
};
use crate::model::analytics::{VisitorAnalytics, VISIT_DATE_FORMAT};
use crate::model::bio::Bio;
use crate::model::contact::ContactMessage;
use crate::model::portfolio::PortfolioFile;
use crate::model::profile::Profile;
use crate::model::showcase::{Certificate, Project, Skill};
use crate::model::{EntityId, ValidationError};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::Row;

impl Entity for Profile {
    const TABLE: &'static str = "profile";
    const COLUMNS: &'static [&'static str] = &[
        "full_name",
        "roles",
        "tagline",
        "location",
        "phone",
        "email",
        "image_url",
        "updated_at",
    ];
    const DEFAULT_ORDER: ListOrder = ListOrder::desc("updated_at");
    const TOUCH_COLUMN: Option<&'static str> = Some("updated_at");

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.full_name),
            text(&self.roles),
            text(&self.tagline),
            text(&self.location),
            text(&self.phone),
            text(&self.email),
            optional_text(self.image_url.as_deref()),
            Value::Integer(self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: parse_id(row, Self::TABLE)?,
            full_name: row.get("full_name")?,
            roles: row.get("roles")?,
            tagline: row.get("tagline")?,
            location: row.get("location")?,
            phone: row.get("phone")?,
            email: row.get("email")?,
            image_url: row.get("image_url")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Profile::validate(self)
    }
}

impl Entity for Bio {
    const TABLE: &'static str = "site_bio";
    const COLUMNS: &'static [&'static str] = &["content", "updated_at", "updated_by"];
    // `updated_at` moves on every commit, so the singleton is keyed on `id`.
    const DEFAULT_ORDER: ListOrder = ListOrder::asc("id");
    const TOUCH_COLUMN: Option<&'static str> = Some("updated_at");

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.content),
            Value::Integer(self.updated_at),
            optional_text(self.updated_by.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: parse_id(row, Self::TABLE)?,
            content: row.get("content")?,
            updated_at: row.get("updated_at")?,
            updated_by: row.get("updated_by")?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Bio::validate(self)
    }
}

impl Entity for Skill {
    const TABLE: &'static str = "skills";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "description",
        "category",
        "display_order",
        "created_at",
        "updated_at",
    ];
    const DEFAULT_ORDER: ListOrder = ListOrder::asc("display_order");
    const TOUCH_COLUMN: Option<&'static str> = Some("updated_at");

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.name),
            text(&self.description),
            text(&self.category),
            Value::Integer(self.display_order),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: parse_id(row, Self::TABLE)?,
            name: row.get("name")?,
            description: row.get("description")?,
            category: row.get("category")?,
            display_order: row.get("display_order")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Skill::validate(self)
    }
}

impl Entity for Certificate {
    const TABLE: &'static str = "certificates";
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "organization",
        "year",
        "description",
        "file_name",
        "file_url",
        "created_at",
    ];
    const DEFAULT_ORDER: ListOrder = ListOrder::desc("year");

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.title),
            text(&self.organization),
            text(&self.year),
            text(&self.description),
            optional_text(self.file_name.as_deref()),
            optional_text(self.file_url.as_deref()),
            Value::Integer(self.created_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: parse_id(row, Self::TABLE)?,
            title: row.get("title")?,
            organization: row.get("organization")?,
            year: row.get("year")?,
            description: row.get("description")?,
            file_name: row.get("file_name")?,
            file_url: row.get("file_url")?,
            created_at: row.get("created_at")?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Certificate::validate(self)
    }
}

impl Entity for Project {
    const TABLE: &'static str = "projects";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "role",
        "tools",
        "description",
        "impact",
        "image_url",
        "created_at",
    ];
    const DEFAULT_ORDER: ListOrder = ListOrder::desc("created_at");

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.name),
            text(&self.role),
            text(&self.tools),
            text(&self.description),
            text(&self.impact),
            optional_text(self.image_url.as_deref()),
            Value::Integer(self.created_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: parse_id(row, Self::TABLE)?,
            name: row.get("name")?,
            role: row.get("role")?,
            tools: row.get("tools")?,
            description: row.get("description")?,
            impact: row.get("impact")?,
            image_url: row.get("image_url")?,
            created_at: row.get("created_at")?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Project::validate(self)
    }
}

impl Entity for PortfolioFile {
    const TABLE: &'static str = "portfolio_files";
    const COLUMNS: &'static [&'static str] = &["name", "size_bytes", "download_url", "uploaded_at"];
    const DEFAULT_ORDER: ListOrder = ListOrder::desc("uploaded_at");

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.name),
            Value::Integer(self.size_bytes),
            text(&self.download_url),
            Value::Integer(self.uploaded_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: parse_id(row, Self::TABLE)?,
            name: row.get("name")?,
            size_bytes: row.get("size_bytes")?,
            download_url: row.get("download_url")?,
            uploaded_at: row.get("uploaded_at")?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        PortfolioFile::validate(self)
    }
}

impl Entity for ContactMessage {
    const TABLE: &'static str = "contact_submissions";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "email",
        "subject",
        "message",
        "is_read",
        "created_at",
    ];
    const DEFAULT_ORDER: ListOrder = ListOrder::desc("created_at");

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.name),
            text(&self.email),
            text(&self.subject),
            text(&self.message),
            bool_value(self.is_read),
            Value::Integer(self.created_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: parse_id(row, Self::TABLE)?,
            name: row.get("name")?,
            email: row.get("email")?,
            subject: row.get("subject")?,
            message: row.get("message")?,
            is_read: parse_bool(row, Self::TABLE, "is_read")?,
            created_at: row.get("created_at")?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ContactMessage::validate(self)
    }
}

impl Entity for VisitorAnalytics {
    const TABLE: &'static str = "visitor_analytics";
    const COLUMNS: &'static [&'static str] =
        &["page_path", "visit_count", "visit_date", "created_at"];
    const DEFAULT_ORDER: ListOrder = ListOrder::desc("visit_date");

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(&self.page_path),
            Value::Integer(self.visit_count),
            Value::Text(self.visit_date.format(VISIT_DATE_FORMAT).to_string()),
            Value::Integer(self.created_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let date_text: String = row.get("visit_date")?;
        let visit_date = NaiveDate::parse_from_str(&date_text, VISIT_DATE_FORMAT).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid date `{date_text}` in visitor_analytics.visit_date"
            ))
        })?;
        Ok(Self {
            id: parse_id(row, Self::TABLE)?,
            page_path: row.get("page_path")?,
            visit_count: row.get("visit_count")?,
            visit_date,
            created_at: row.get("created_at")?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        VisitorAnalytics::validate(self)
    }
}
