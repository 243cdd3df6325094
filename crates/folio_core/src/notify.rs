//! Notification surface for transient success/error messages.
//!
//! # Responsibility
//! - Define the `Notifier` seam injected into services and sessions.
//! - Provide an in-memory queue and a log-backed implementation.
//!
//! # Invariants
//! - Each remote-operation outcome is reported at most once per attempt.

use log::{error, info};
use serde::Serialize;
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: Option<String>,
}

pub trait Notifier {
    fn notify(&self, kind: NotificationKind, title: &str, description: Option<&str>);

    fn success(&self, title: &str) {
        self.notify(NotificationKind::Success, title, None);
    }

    fn error(&self, title: &str, description: &str) {
        self.notify(NotificationKind::Error, title, Some(description));
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, kind: NotificationKind, title: &str, description: Option<&str>) {
        (**self).notify(kind, title, description);
    }
}

/// Queue of notifications awaiting display.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    queue: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything queued so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.queue.borrow().clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.queue
            .borrow()
            .iter()
            .filter(|notification| notification.kind == kind)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, title: &str, description: Option<&str>) {
        self.queue.borrow_mut().push(Notification {
            kind,
            title: title.to_string(),
            description: description.map(str::to_string),
        });
    }
}

/// Routes notifications to the process log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NotificationKind, title: &str, description: Option<&str>) {
        match kind {
            NotificationKind::Success => {
                info!("event=notify module=notify kind=success title={title:?}")
            }
            NotificationKind::Error => error!(
                "event=notify module=notify kind=error title={title:?} description={:?}",
                description.unwrap_or_default()
            ),
        }
    }
}
