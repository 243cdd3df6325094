//! Repository layer: the entity store seam and its SQLite implementation.
//!
//! # Responsibility
//! - Define the per-entity create/read/update/delete/list contract.
//! - Keep SQL and row decoding inside the persistence boundary.
//!
//! # Invariants
//! - Writes call the record's validation before any SQL runs.
//! - Reads reject malformed persisted rows instead of masking them.
//! - Missing rows on update/delete surface as `RepoError::NotFound`.

pub mod analytics_repo;
pub mod entity_repo;
mod records;

pub use analytics_repo::{AnalyticsRepository, SqliteAnalyticsRepository};
pub use entity_repo::{
    count_rows, Entity, EntityRepository, ListOrder, RepoError, RepoResult, SortDirection,
    SqliteEntityRepository,
};
