//! Generic create/read/update/delete service for showcase entities.
//!
//! # Invariants
//! - `list` reads through the cache under the entity's `QueryKey`.
//! - Every successful write invalidates that key.

use crate::cache::{QueryCache, QueryKey};
use crate::error::{ServiceError, ServiceResult};
use crate::model::portfolio::PortfolioFile;
use crate::model::profile::Profile;
use crate::model::showcase::{Certificate, Project, Skill};
use crate::model::EntityId;
use crate::repo::{Entity, EntityRepository};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Entity managed through a dashboard form.
pub trait CatalogEntity: Entity + Clone + Serialize + DeserializeOwned {
    /// Singular display label, capitalized ("Skill").
    const LABEL: &'static str;
    const QUERY_KEY: QueryKey;
}

impl CatalogEntity for Skill {
    const LABEL: &'static str = "Skill";
    const QUERY_KEY: QueryKey = QueryKey::Skills;
}

impl CatalogEntity for Certificate {
    const LABEL: &'static str = "Certificate";
    const QUERY_KEY: QueryKey = QueryKey::Certificates;
}

impl CatalogEntity for Project {
    const LABEL: &'static str = "Project";
    const QUERY_KEY: QueryKey = QueryKey::Projects;
}

impl CatalogEntity for PortfolioFile {
    const LABEL: &'static str = "File";
    const QUERY_KEY: QueryKey = QueryKey::PortfolioFiles;
}

impl CatalogEntity for Profile {
    const LABEL: &'static str = "Profile";
    const QUERY_KEY: QueryKey = QueryKey::Profile;
}

pub struct CatalogService<'c, E: CatalogEntity, R: EntityRepository<E>> {
    repo: R,
    cache: &'c QueryCache,
    _entity: PhantomData<fn() -> E>,
}

impl<'c, E: CatalogEntity, R: EntityRepository<E>> CatalogService<'c, E, R> {
    pub fn new(repo: R, cache: &'c QueryCache) -> Self {
        Self {
            repo,
            cache,
            _entity: PhantomData,
        }
    }

    /// All records in the entity's default order.
    pub fn list(&self) -> ServiceResult<Vec<E>> {
        self.cache.get_or_fetch(E::QUERY_KEY, || {
            self.repo
                .list_all(E::DEFAULT_ORDER)
                .map_err(ServiceError::read(E::TABLE))
        })
    }

    pub fn fetch_one(&self) -> ServiceResult<Option<E>> {
        self.repo.fetch_one().map_err(ServiceError::read(E::TABLE))
    }

    pub fn get(&self, id: EntityId) -> ServiceResult<Option<E>> {
        self.repo.get(id).map_err(ServiceError::read(E::TABLE))
    }

    pub fn create(&self, record: &E) -> ServiceResult<E> {
        let created = self
            .repo
            .create_one(record)
            .map_err(ServiceError::write(E::TABLE))?;
        self.cache.invalidate(E::QUERY_KEY);
        Ok(created)
    }

    pub fn update(&self, record: &E) -> ServiceResult<E> {
        let updated = self
            .repo
            .update_one(record)
            .map_err(ServiceError::write(E::TABLE))?;
        self.cache.invalidate(E::QUERY_KEY);
        Ok(updated)
    }

    pub fn delete(&self, id: EntityId) -> ServiceResult<()> {
        self.repo
            .delete_one(id)
            .map_err(ServiceError::write(E::TABLE))?;
        self.cache.invalidate(E::QUERY_KEY);
        Ok(())
    }
}
