//! Use-case services over the entity store.
//!
//! # Responsibility
//! - Orchestrate repository calls into dashboard and public-site use cases.
//! - Keep the explicit `QueryCache` coherent: reads go through it, every
//!   successful mutation invalidates the affected key.
//!
//! # Invariants
//! - Services never bypass repository validation.
//! - Failures are classified as `ServiceError` (validation/read/write).

pub mod analytics_service;
pub mod bio_service;
pub mod catalog_service;
pub mod inbox_service;

pub use analytics_service::{AnalyticsService, AnalyticsSummary, MonthlyVisits, PageVisits};
pub use bio_service::BioService;
pub use catalog_service::{CatalogEntity, CatalogService};
pub use inbox_service::InboxService;
