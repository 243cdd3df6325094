//! Public site composition.
//!
//! # Responsibility
//! - Read every published entity and shape it into page sections.
//!
//! # Invariants
//! - Rendering never writes to the store.
//! - A failed read empties only its own section; the page still renders.

mod page;

pub use page::{
    group_skills, About, CertificateCard, ContactDetails, Hero, ProjectCard, PublicPage,
    SkillCard, SkillGroup, DEFAULT_ABOUT,
};

use crate::cache::QueryCache;
use crate::error::ServiceResult;
use crate::model::bio::Bio;
use crate::model::profile::Profile;
use crate::model::showcase::{Certificate, Project, Skill};
use crate::repo::SqliteEntityRepository;
use crate::service::{BioService, CatalogEntity, CatalogService};
use log::{info, warn};
use rusqlite::Connection;
use std::time::Instant;

pub struct SiteRenderer<'a> {
    conn: &'a Connection,
    cache: &'a QueryCache,
}

impl<'a> SiteRenderer<'a> {
    pub fn new(conn: &'a Connection, cache: &'a QueryCache) -> Self {
        Self { conn, cache }
    }

    pub fn render(&self) -> PublicPage {
        let started_at = Instant::now();

        let profile: Option<Profile> = degrade("profile", self.catalog::<Profile>().fetch_one());
        let bio: Option<Bio> = degrade(
            "bio",
            BioService::new(SqliteEntityRepository::<Bio>::new(self.conn), self.cache).fetch(),
        );
        let skills = degrade("skills", self.catalog::<Skill>().list());
        let projects = degrade("projects", self.catalog::<Project>().list());
        let certificates = degrade("certificates", self.catalog::<Certificate>().list());

        let page = PublicPage {
            hero: profile.as_ref().map(Hero::from),
            about: About::from_content(bio.as_ref().map(|bio| bio.content.as_str())),
            skills: group_skills(&skills),
            projects: projects.iter().map(ProjectCard::from).collect(),
            certificates: certificates.iter().map(CertificateCard::from).collect(),
            contact: profile
                .as_ref()
                .map(ContactDetails::from)
                .unwrap_or_default(),
        };
        info!(
            "event=site_render module=site status=ok skills={} projects={} certificates={} duration_ms={}",
            skills.len(),
            projects.len(),
            certificates.len(),
            started_at.elapsed().as_millis()
        );
        page
    }

    fn catalog<E: CatalogEntity>(
        &self,
    ) -> CatalogService<'a, E, SqliteEntityRepository<'a, E>> {
        CatalogService::new(SqliteEntityRepository::new(self.conn), self.cache)
    }
}

fn degrade<T: Default>(section: &str, result: ServiceResult<T>) -> T {
    result.unwrap_or_else(|err| {
        warn!("event=site_render module=site status=error section={section} error={err}");
        T::default()
    })
}
