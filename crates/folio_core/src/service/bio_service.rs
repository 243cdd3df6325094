//! Singleton biography reads and full-content commits.

use crate::cache::{QueryCache, QueryKey};
use crate::dashboard::autosave::BioBackend;
use crate::error::{ServiceError, ServiceResult};
use crate::model::bio::Bio;
use crate::model::EntityId;
use crate::repo::{EntityRepository, RepoError};
use log::info;

const ENTITY: &str = "bio";

pub struct BioService<'c, R: EntityRepository<Bio>> {
    repo: R,
    cache: &'c QueryCache,
    operator: Option<String>,
}

impl<'c, R: EntityRepository<Bio>> BioService<'c, R> {
    pub fn new(repo: R, cache: &'c QueryCache) -> Self {
        Self {
            repo,
            cache,
            operator: None,
        }
    }

    /// Stamps subsequent commits with `updated_by = operator`.
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    /// Returns the stored bio, if any, through the read cache.
    pub fn fetch(&self) -> ServiceResult<Option<Bio>> {
        self.cache.get_or_fetch(QueryKey::Bio, || {
            self.repo.fetch_one().map_err(ServiceError::read(ENTITY))
        })
    }

    /// Creates the singleton row. Fails when one already exists.
    pub fn create(&self, content: impl Into<String>) -> ServiceResult<Bio> {
        if let Some(existing) = self.repo.fetch_one().map_err(ServiceError::read(ENTITY))? {
            return Err(ServiceError::RemoteWrite {
                entity: ENTITY,
                source: RepoError::InvalidData(format!(
                    "bio {} already exists; update it instead",
                    existing.id
                )),
            });
        }
        let mut bio = Bio::new(content);
        bio.updated_by.clone_from(&self.operator);
        let created = self
            .repo
            .create_one(&bio)
            .map_err(ServiceError::write(ENTITY))?;
        self.cache.invalidate(QueryKey::Bio);
        Ok(created)
    }

    /// Replaces the content of bio `id` in one write.
    pub fn update_content(&self, id: EntityId, content: &str) -> ServiceResult<Bio> {
        let mut bio = self
            .repo
            .get(id)
            .map_err(ServiceError::read(ENTITY))?
            .ok_or(ServiceError::RemoteWrite {
                entity: ENTITY,
                source: RepoError::NotFound {
                    table: "site_bio",
                    id,
                },
            })?;
        bio.content = content.to_string();
        bio.updated_by.clone_from(&self.operator);

        let stored = self
            .repo
            .update_one(&bio)
            .map_err(ServiceError::write(ENTITY))?;
        self.cache.invalidate(QueryKey::Bio);
        info!(
            "event=bio_update module=service status=ok id={} chars={}",
            id,
            stored.char_count()
        );
        Ok(stored)
    }
}

impl<R: EntityRepository<Bio>> BioBackend for BioService<'_, R> {
    fn fetch_bio(&self) -> ServiceResult<Option<Bio>> {
        self.fetch()
    }

    fn commit_bio(&self, id: EntityId, content: &str) -> ServiceResult<Bio> {
        self.update_content(id, content)
    }
}
