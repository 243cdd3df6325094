//! Per-page daily visit counters.

use super::{now_epoch_ms, require_text, EntityId, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const VISIT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorAnalytics {
    pub id: EntityId,
    pub page_path: String,
    pub visit_count: i64,
    pub visit_date: NaiveDate,
    pub created_at: i64,
}

impl VisitorAnalytics {
    /// First visit of `page_path` on `visit_date`.
    pub fn first_visit(page_path: impl Into<String>, visit_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            page_path: page_path.into(),
            visit_count: 1,
            visit_date,
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("page_path", &self.page_path)?;
        if self.visit_count < 0 {
            return Err(ValidationError::new("visit_count", "must not be negative"));
        }
        Ok(())
    }

    /// `YYYY-MM` bucket used by the monthly chart.
    pub fn month_key(&self) -> String {
        self.visit_date.format("%Y-%m").to_string()
    }
}
