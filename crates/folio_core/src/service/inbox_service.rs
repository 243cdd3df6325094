//! Contact inbox reads/writes and public contact-form submission.

use crate::cache::{QueryCache, QueryKey};
use crate::dashboard::inbox::InboxBackend;
use crate::error::{ServiceError, ServiceResult};
use crate::model::contact::{ContactMessage, ContactSubmission};
use crate::model::EntityId;
use crate::notify::Notifier;
use crate::repo::{Entity, EntityRepository, RepoError};
use log::info;

const ENTITY: &str = "contact message";

pub struct InboxService<'c, R: EntityRepository<ContactMessage>> {
    repo: R,
    cache: &'c QueryCache,
}

impl<'c, R: EntityRepository<ContactMessage>> InboxService<'c, R> {
    pub fn new(repo: R, cache: &'c QueryCache) -> Self {
        Self { repo, cache }
    }

    /// Messages newest first.
    pub fn list(&self) -> ServiceResult<Vec<ContactMessage>> {
        self.cache.get_or_fetch(QueryKey::Contacts, || {
            self.repo
                .list_all(ContactMessage::DEFAULT_ORDER)
                .map_err(ServiceError::read(ENTITY))
        })
    }

    pub fn get(&self, id: EntityId) -> ServiceResult<Option<ContactMessage>> {
        self.repo.get(id).map_err(ServiceError::read(ENTITY))
    }

    /// Validates and stores a visitor submission.
    ///
    /// Invalid input is rejected locally and never reaches the store.
    pub fn submit(&self, submission: ContactSubmission) -> ServiceResult<ContactMessage> {
        let message = submission.into_message()?;
        let stored = self
            .repo
            .create_one(&message)
            .map_err(ServiceError::write(ENTITY))?;
        self.cache.invalidate(QueryKey::Contacts);
        info!(
            "event=contact_submit module=service status=ok id={} message_chars={}",
            stored.id,
            stored.message.chars().count()
        );
        Ok(stored)
    }

    /// Public form flow: submit and report the outcome once.
    pub fn submit_and_notify<N: Notifier>(
        &self,
        submission: ContactSubmission,
        notifier: &N,
    ) -> ServiceResult<ContactMessage> {
        match self.submit(submission) {
            Ok(message) => {
                notifier.success("Message sent successfully!");
                Ok(message)
            }
            Err(err) => {
                notifier.error("Error sending message", &err.to_string());
                Err(err)
            }
        }
    }

    pub fn set_read(&self, id: EntityId, is_read: bool) -> ServiceResult<ContactMessage> {
        let mut message = self.get(id)?.ok_or(ServiceError::RemoteWrite {
            entity: ENTITY,
            source: RepoError::NotFound {
                table: "contact_submissions",
                id,
            },
        })?;
        message.is_read = is_read;
        let stored = self
            .repo
            .update_one(&message)
            .map_err(ServiceError::write(ENTITY))?;
        self.cache.invalidate(QueryKey::Contacts);
        Ok(stored)
    }

    pub fn delete(&self, id: EntityId) -> ServiceResult<()> {
        self.repo
            .delete_one(id)
            .map_err(ServiceError::write(ENTITY))?;
        self.cache.invalidate(QueryKey::Contacts);
        Ok(())
    }
}

impl<R: EntityRepository<ContactMessage>> InboxBackend for InboxService<'_, R> {
    fn list_messages(&self) -> ServiceResult<Vec<ContactMessage>> {
        self.list()
    }

    fn set_read(&self, id: EntityId, is_read: bool) -> ServiceResult<()> {
        InboxService::set_read(self, id, is_read).map(|_| ())
    }

    fn delete_message(&self, id: EntityId) -> ServiceResult<()> {
        self.delete(id)
    }
}
