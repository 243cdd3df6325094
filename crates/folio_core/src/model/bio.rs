//! Site biography ("CEO statement") record.
//!
//! # Invariants
//! - At most one row is consumed by the dashboard and the public page.
//! - `content` is only replaced as a whole; partial writes do not exist.

use super::{now_epoch_ms, EntityId, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bio {
    pub id: EntityId,
    /// Free-form statement text shown in the about section.
    pub content: String,
    pub updated_at: i64,
    /// Operator that performed the last write, when known.
    pub updated_by: Option<String>,
}

impl Bio {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            updated_at: now_epoch_ms(),
            updated_by: None,
        }
    }

    /// Bio content has no field constraints; empty text is a valid state.
    pub fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Character count displayed under the editor.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}
