//! Core domain logic for Folio, a single-owner portfolio site and its
//! content dashboard.
//! This crate is the single source of truth for content invariants.

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod site;
pub mod upload;

pub use cache::{QueryCache, QueryKey};
pub use config::{ConfigError, FolioConfig};
pub use dashboard::{
    AutoSaveSynchronizer, AutosaveTiming, BioEditSession, EditorMode, EntityEditor,
    InboxManager, PortfolioManager, ProfileEditor, SaveNow, SaveStatus,
};
pub use error::{ErrorClass, ServiceError, ServiceResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{EntityId, ValidationError};
pub use notify::{LogNotifier, Notification, NotificationKind, Notifier, RecordingNotifier};
pub use repo::{
    Entity, EntityRepository, ListOrder, RepoError, RepoResult, SqliteAnalyticsRepository,
    SqliteEntityRepository,
};
pub use service::{AnalyticsService, AnalyticsSummary, BioService, CatalogService, InboxService};
pub use site::{PublicPage, SiteRenderer};
pub use upload::{ObjectStore, Upload, UploadError, UploadPolicy};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
