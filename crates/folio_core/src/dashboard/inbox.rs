//! Inbox list/detail controller with read-state transitions.
//!
//! # Responsibility
//! - Track the active selection over the last known-good message list.
//! - Flip `is_read` exactly once when an unread message is selected.
//!
//! # Invariants
//! - The selection never refers to a message that has been deleted.
//! - The unread count is derived from the list on every call.
//! - Read flips are optimistic and reverted on failure; deletes are applied
//!   locally only after the store confirms them.

use crate::error::ServiceResult;
use crate::model::contact::ContactMessage;
use crate::model::EntityId;
use crate::notify::Notifier;
use log::{info, warn};

pub trait InboxBackend {
    fn list_messages(&self) -> ServiceResult<Vec<ContactMessage>>;
    fn set_read(&self, id: EntityId, is_read: bool) -> ServiceResult<()>;
    fn delete_message(&self, id: EntityId) -> ServiceResult<()>;
}

impl<B: InboxBackend + ?Sized> InboxBackend for &B {
    fn list_messages(&self) -> ServiceResult<Vec<ContactMessage>> {
        (**self).list_messages()
    }

    fn set_read(&self, id: EntityId, is_read: bool) -> ServiceResult<()> {
        (**self).set_read(id, is_read)
    }

    fn delete_message(&self, id: EntityId) -> ServiceResult<()> {
        (**self).delete_message(id)
    }
}

pub struct InboxManager<B: InboxBackend, N: Notifier> {
    backend: B,
    notifier: N,
    messages: Vec<ContactMessage>,
    selected: Option<EntityId>,
}

impl<B: InboxBackend, N: Notifier> InboxManager<B, N> {
    pub fn new(backend: B, notifier: N) -> Self {
        Self {
            backend,
            notifier,
            messages: Vec::new(),
            selected: None,
        }
    }

    /// Reloads the list. On failure the previous list is kept.
    pub fn refresh(&mut self) -> ServiceResult<()> {
        match self.backend.list_messages() {
            Ok(messages) => {
                self.messages = messages;
                if let Some(id) = self.selected {
                    if self.position(id).is_none() {
                        self.selected = None;
                    }
                }
                Ok(())
            }
            Err(err) => {
                self.notifier
                    .error("Error loading messages", &err.to_string());
                Err(err)
            }
        }
    }

    /// Selects `id`, marking it read when it was unread.
    ///
    /// Returns the selected message, or `None` when `id` is not in the list.
    pub fn select_message(&mut self, id: EntityId) -> Option<&ContactMessage> {
        let idx = self.position(id)?;
        self.selected = Some(id);

        if !self.messages[idx].is_read {
            self.messages[idx].is_read = true;
            match self.backend.set_read(id, true) {
                Ok(()) => info!("event=inbox_mark_read module=inbox status=ok id={id}"),
                Err(err) => {
                    warn!("event=inbox_mark_read module=inbox status=error id={id} error={err}");
                    if let Some(idx) = self.position(id) {
                        self.messages[idx].is_read = false;
                    }
                    self.notifier
                        .error("Error updating message", &err.to_string());
                }
            }
        }
        self.selected()
    }

    /// Deletes `id` from the store, then from the list and the selection.
    ///
    /// Returns whether the store confirmed the delete.
    pub fn delete_message(&mut self, id: EntityId) -> bool {
        match self.backend.delete_message(id) {
            Ok(()) => {
                self.messages.retain(|message| message.id != id);
                if self.selected == Some(id) {
                    self.selected = None;
                }
                self.notifier.success("Message deleted");
                info!("event=inbox_delete module=inbox status=ok id={id}");
                true
            }
            Err(err) => {
                warn!("event=inbox_delete module=inbox status=error id={id} error={err}");
                self.notifier
                    .error("Error deleting message", &err.to_string());
                false
            }
        }
    }

    pub fn selected_id(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&ContactMessage> {
        let id = self.selected?;
        self.messages.iter().find(|message| message.id == id)
    }

    pub fn messages(&self) -> &[ContactMessage] {
        &self.messages
    }

    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|message| !message.is_read).count()
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.messages.iter().position(|message| message.id == id)
    }
}
