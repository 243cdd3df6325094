use super::session::{
    AutosaveTiming, BioEditSession, CommitOutcome, CommitRequest, ManualSaveOutcome,
};
use crate::error::ServiceResult;
use crate::model::bio::Bio;
use crate::model::EntityId;
use crate::notify::Notifier;
use log::{error, info, warn};
use std::time::Instant;

const SAVED_TITLE: &str = "Bio saved successfully";
const SAVE_FAILED_TITLE: &str = "Error saving bio";
const LOAD_FAILED_TITLE: &str = "Error loading bio";

/// Store operations the synchronizer needs for the singleton bio.
pub trait BioBackend {
    fn fetch_bio(&self) -> ServiceResult<Option<Bio>>;
    /// Writes the full `content` to bio `id` and returns the stored record.
    fn commit_bio(&self, id: EntityId, content: &str) -> ServiceResult<Bio>;
}

impl<B: BioBackend + ?Sized> BioBackend for &B {
    fn fetch_bio(&self) -> ServiceResult<Option<Bio>> {
        (**self).fetch_bio()
    }

    fn commit_bio(&self, id: EntityId, content: &str) -> ServiceResult<Bio> {
        (**self).commit_bio(id, content)
    }
}

/// Result of an explicit "Save now" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveNow {
    Committed,
    Failed,
    Unchanged,
    Busy,
    NoTarget,
    Closed,
}

/// Runs a `BioEditSession` against a backend on the event-loop thread.
///
/// Commits are executed to completion inside `tick`/`save_now`; each
/// outcome is reported exactly once through the notifier.
pub struct AutoSaveSynchronizer<B: BioBackend, N: Notifier> {
    backend: B,
    notifier: N,
    session: BioEditSession,
}

impl<B: BioBackend, N: Notifier> AutoSaveSynchronizer<B, N> {
    pub fn new(backend: B, notifier: N, timing: AutosaveTiming) -> Self {
        Self {
            backend,
            notifier,
            session: BioEditSession::new(timing),
        }
    }

    /// Fetches the stored bio into the session.
    ///
    /// Safe to call again as a refresh: unsaved edits are kept.
    pub fn load(&mut self) -> ServiceResult<()> {
        match self.backend.fetch_bio() {
            Ok(bio) => {
                let replaced = self.session.load_remote(bio.as_ref());
                info!(
                    "event=bio_load module=autosave status=ok found={} buffer_replaced={}",
                    bio.is_some(),
                    replaced
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=bio_load module=autosave status=error error={}",
                    err
                );
                self.notifier.error(LOAD_FAILED_TITLE, &err.to_string());
                Err(err)
            }
        }
    }

    pub fn edit(&mut self, text: impl Into<String>, now: Instant) {
        self.session.edit(text, now);
    }

    /// Advances timers to `now`, running an autosave commit when one is due.
    pub fn tick(&mut self, now: Instant) -> Option<CommitOutcome> {
        let request = self.session.poll(now)?;
        Some(self.run_commit(request, now))
    }

    /// Commits the buffer immediately, unless a commit is already running.
    pub fn save_now(&mut self, now: Instant) -> SaveNow {
        match self.session.manual_save() {
            ManualSaveOutcome::Started(request) => match self.run_commit(request, now) {
                CommitOutcome::Saved => SaveNow::Committed,
                CommitOutcome::Failed | CommitOutcome::Stale => SaveNow::Failed,
            },
            ManualSaveOutcome::Unchanged => SaveNow::Unchanged,
            ManualSaveOutcome::Busy => SaveNow::Busy,
            ManualSaveOutcome::NoTarget => SaveNow::NoTarget,
            ManualSaveOutcome::Closed => SaveNow::Closed,
        }
    }

    fn run_commit(&mut self, request: CommitRequest, now: Instant) -> CommitOutcome {
        let started_at = Instant::now();
        match self.backend.commit_bio(request.bio_id, &request.content) {
            Ok(_) => {
                let outcome = self.session.complete_success(request.ticket, now);
                info!(
                    "event=bio_commit module=autosave status=ok trigger={} chars={} duration_ms={}",
                    request.trigger.label(),
                    request.content.chars().count(),
                    started_at.elapsed().as_millis()
                );
                if outcome == CommitOutcome::Saved {
                    self.notifier.success(SAVED_TITLE);
                }
                outcome
            }
            Err(err) => {
                let outcome = self.session.complete_failure(request.ticket);
                error!(
                    "event=bio_commit module=autosave status=error trigger={} duration_ms={} error={}",
                    request.trigger.label(),
                    started_at.elapsed().as_millis(),
                    err
                );
                if outcome == CommitOutcome::Failed {
                    self.notifier.error(SAVE_FAILED_TITLE, &err.to_string());
                }
                outcome
            }
        }
    }

    /// Ends the editing session; no commit can start afterwards.
    pub fn close(&mut self) {
        if self.session.is_closed() {
            return;
        }
        if self.session.close() {
            warn!("event=bio_session_close module=autosave status=ok discarded_unsaved=true");
        }
    }

    pub fn session(&self) -> &BioEditSession {
        &self.session
    }

    pub fn next_wakeup(&self) -> Option<Instant> {
        self.session.next_wakeup()
    }
}

impl<B: BioBackend, N: Notifier> Drop for AutoSaveSynchronizer<B, N> {
    fn drop(&mut self) {
        self.close();
    }
}
