//! Service-level error taxonomy.
//!
//! # Responsibility
//! - Classify failures as validation, remote-read or remote-write.
//! - Carry the entity label used in user-facing notifications.

use crate::model::ValidationError;
use crate::repo::RepoError;
use crate::upload::UploadError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caught locally; the store was never contacted.
    Validation,
    /// Initial or refresh fetch failed.
    RemoteRead,
    /// Store rejected a create/update/delete.
    RemoteWrite,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to load {entity}: {source}")]
    RemoteRead {
        entity: &'static str,
        #[source]
        source: RepoError,
    },
    #[error("failed to save {entity}: {source}")]
    RemoteWrite {
        entity: &'static str,
        #[source]
        source: RepoError,
    },
    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl ServiceError {
    pub fn read(entity: &'static str) -> impl FnOnce(RepoError) -> Self {
        move |source| Self::RemoteRead { entity, source }
    }

    /// Repository validation failures stay validation failures.
    pub fn write(entity: &'static str) -> impl FnOnce(RepoError) -> Self {
        move |source| match source {
            RepoError::Validation(err) => Self::Validation(err),
            source => Self::RemoteWrite { entity, source },
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) => ErrorClass::Validation,
            Self::Upload(err) if err.is_policy_violation() => ErrorClass::Validation,
            Self::RemoteRead { .. } => ErrorClass::RemoteRead,
            Self::RemoteWrite { .. } | Self::Upload(_) => ErrorClass::RemoteWrite,
        }
    }

    /// Whether the failure was a missing row rather than a transport error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RemoteRead {
                source: RepoError::NotFound { .. },
                ..
            } | Self::RemoteWrite {
                source: RepoError::NotFound { .. },
                ..
            }
        )
    }
}
