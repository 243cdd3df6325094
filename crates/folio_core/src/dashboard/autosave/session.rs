use super::timer::DebounceTimer;
use crate::model::bio::Bio;
use crate::model::EntityId;
use std::time::{Duration, Instant};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2000);
const DEFAULT_SAVED_DISPLAY: Duration = Duration::from_millis(2000);

/// Quiet period before an autosave and how long "Auto-saved" stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveTiming {
    pub debounce: Duration,
    pub saved_display: Duration,
}

impl Default for AutosaveTiming {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            saved_display: DEFAULT_SAVED_DISPLAY,
        }
    }
}

/// Save feedback shown next to the editor. `dirty` is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    Debounce,
    Manual,
}

impl SaveTrigger {
    pub fn label(self) -> &'static str {
        match self {
            Self::Debounce => "debounce",
            Self::Manual => "manual",
        }
    }
}

/// Identifies one commit attempt; completions carrying an old ticket are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CommitTicket(u64);

/// Full-buffer write the caller must send to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    pub ticket: CommitTicket,
    pub bio_id: EntityId,
    pub content: String,
    pub trigger: SaveTrigger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualSaveOutcome {
    Started(CommitRequest),
    /// Buffer already equals the committed content.
    Unchanged,
    /// A commit is in flight; the request is rejected.
    Busy,
    /// No stored bio to write to.
    NoTarget,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Saved,
    Failed,
    /// Ticket did not match the in-flight commit.
    Stale,
}

#[derive(Debug, Clone)]
struct InFlight {
    ticket: CommitTicket,
    content: String,
}

/// Editor-local state for one biography editing session.
#[derive(Debug, Clone)]
pub struct BioEditSession {
    timing: AutosaveTiming,
    bio_id: Option<EntityId>,
    buffer: String,
    committed: String,
    dirty: bool,
    status: SaveStatus,
    debounce: DebounceTimer,
    saved_display: DebounceTimer,
    in_flight: Option<InFlight>,
    next_ticket: u64,
    closed: bool,
}

impl BioEditSession {
    pub fn new(timing: AutosaveTiming) -> Self {
        Self {
            timing,
            bio_id: None,
            buffer: String::new(),
            committed: String::new(),
            dirty: false,
            status: SaveStatus::Idle,
            debounce: DebounceTimer::new(),
            saved_display: DebounceTimer::new(),
            in_flight: None,
            next_ticket: 0,
            closed: false,
        }
    }

    /// Applies a fetched bio.
    ///
    /// The buffer is replaced only while there are no unsaved local edits, so
    /// a late or concurrent read never clobbers typing in progress. Returns
    /// whether the buffer was replaced.
    pub fn load_remote(&mut self, bio: Option<&Bio>) -> bool {
        if self.closed {
            return false;
        }
        let Some(bio) = bio else {
            return false;
        };

        self.bio_id = Some(bio.id);
        if self.dirty || self.in_flight.is_some() {
            return false;
        }
        self.buffer.clone_from(&bio.content);
        self.committed.clone_from(&bio.content);
        true
    }

    /// Replaces the buffer and restarts the quiet period.
    ///
    /// An edit during the "Auto-saved" window ends that window immediately.
    pub fn edit(&mut self, text: impl Into<String>, now: Instant) {
        if self.closed {
            return;
        }
        self.buffer = text.into();
        self.dirty = true;
        self.debounce.arm(now, self.timing.debounce);
        if self.status == SaveStatus::Saved {
            self.saved_display.cancel();
            self.status = SaveStatus::Idle;
        }
    }

    /// Fires due timers. Returns a commit to send when the debounce expired
    /// with a non-blank dirty buffer.
    ///
    /// A debounce that expires while a commit is in flight stays armed and
    /// fires on the first poll after that commit completes.
    pub fn poll(&mut self, now: Instant) -> Option<CommitRequest> {
        if self.closed {
            return None;
        }
        if self.status == SaveStatus::Saved && self.saved_display.take_if_due(now) {
            self.status = SaveStatus::Idle;
        }
        if self.in_flight.is_some() || !self.debounce.take_if_due(now) {
            return None;
        }
        if !self.dirty || self.buffer.trim().is_empty() {
            return None;
        }
        let bio_id = self.bio_id?;
        Some(self.start_commit(bio_id, SaveTrigger::Debounce))
    }

    /// Explicit "Save now". Cancels the pending debounce when a commit starts.
    pub fn manual_save(&mut self) -> ManualSaveOutcome {
        if self.closed {
            return ManualSaveOutcome::Closed;
        }
        if self.in_flight.is_some() {
            return ManualSaveOutcome::Busy;
        }
        let Some(bio_id) = self.bio_id else {
            return ManualSaveOutcome::NoTarget;
        };
        if !self.dirty && self.buffer == self.committed {
            return ManualSaveOutcome::Unchanged;
        }
        self.debounce.cancel();
        ManualSaveOutcome::Started(self.start_commit(bio_id, SaveTrigger::Manual))
    }

    fn start_commit(&mut self, bio_id: EntityId, trigger: SaveTrigger) -> CommitRequest {
        self.next_ticket += 1;
        let ticket = CommitTicket(self.next_ticket);
        self.in_flight = Some(InFlight {
            ticket,
            content: self.buffer.clone(),
        });
        self.saved_display.cancel();
        self.status = SaveStatus::Saving;
        CommitRequest {
            ticket,
            bio_id,
            content: self.buffer.clone(),
            trigger,
        }
    }

    /// Records a successful write of the snapshot carried by `ticket`.
    ///
    /// Edits typed while the commit was in flight keep the session dirty.
    pub fn complete_success(&mut self, ticket: CommitTicket, now: Instant) -> CommitOutcome {
        let Some(in_flight) = self.take_in_flight(ticket) else {
            return CommitOutcome::Stale;
        };
        self.committed = in_flight.content;
        self.dirty = self.buffer != self.committed;
        self.status = SaveStatus::Saved;
        self.saved_display.arm(now, self.timing.saved_display);
        CommitOutcome::Saved
    }

    /// Records a failed write. No retry is scheduled; the edit stays in the
    /// buffer until the operator edits again or saves manually.
    pub fn complete_failure(&mut self, ticket: CommitTicket) -> CommitOutcome {
        if self.take_in_flight(ticket).is_none() {
            return CommitOutcome::Stale;
        }
        self.dirty = self.dirty || self.buffer != self.committed;
        self.status = SaveStatus::Idle;
        CommitOutcome::Failed
    }

    fn take_in_flight(&mut self, ticket: CommitTicket) -> Option<InFlight> {
        match &self.in_flight {
            Some(in_flight) if in_flight.ticket == ticket => self.in_flight.take(),
            _ => None,
        }
    }

    /// Ends the session: cancels both timers and detaches any in-flight
    /// commit. Returns whether unsaved edits were discarded.
    pub fn close(&mut self) -> bool {
        self.debounce.cancel();
        self.saved_display.cancel();
        self.in_flight = None;
        self.closed = true;
        self.dirty
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Last content confirmed by the store.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// Indicator text; `None` while idle.
    pub fn status_label(&self) -> Option<&'static str> {
        match self.status {
            SaveStatus::Idle => None,
            SaveStatus::Saving => Some("Saving..."),
            SaveStatus::Saved => Some("Auto-saved"),
        }
    }

    pub fn bio_id(&self) -> Option<EntityId> {
        self.bio_id
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_commit_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_debounce_armed(&self) -> bool {
        self.debounce.is_armed()
    }

    pub fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Earliest instant at which `poll` may change state.
    pub fn next_wakeup(&self) -> Option<Instant> {
        [self.debounce.deadline(), self.saved_display.deadline()]
            .into_iter()
            .flatten()
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AutosaveTiming, BioEditSession, CommitOutcome, ManualSaveOutcome, SaveStatus, SaveTrigger,
    };
    use crate::model::bio::Bio;
    use std::time::{Duration, Instant};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn loaded_session(content: &str) -> (BioEditSession, Bio) {
        let bio = Bio::new(content);
        let mut session = BioEditSession::new(AutosaveTiming::default());
        assert!(session.load_remote(Some(&bio)));
        (session, bio)
    }

    #[test]
    fn edits_within_window_coalesce_into_one_commit_of_final_value() {
        let t0 = Instant::now();
        let (mut session, bio) = loaded_session("A");

        session.edit("AB", t0);
        session.edit("ABC", t0 + ms(500));

        assert_eq!(session.poll(t0 + ms(2000)), None);
        assert_eq!(session.poll(t0 + ms(2499)), None);
        let request = session.poll(t0 + ms(2500)).expect("commit at 2500ms");
        assert_eq!(request.content, "ABC");
        assert_eq!(request.bio_id, bio.id);
        assert_eq!(request.trigger, SaveTrigger::Debounce);
        assert_eq!(session.status(), SaveStatus::Saving);
        assert_eq!(session.poll(t0 + ms(5000)), None);
    }

    #[test]
    fn blank_buffer_is_never_autosaved() {
        let t0 = Instant::now();
        let (mut session, _) = loaded_session("A");
        session.edit("   ", t0);

        assert_eq!(session.poll(t0 + ms(2000)), None);
        assert!(session.is_dirty());
        assert_eq!(session.status(), SaveStatus::Idle);
    }

    #[test]
    fn saved_lasts_display_window_then_returns_to_idle() {
        let t0 = Instant::now();
        let (mut session, _) = loaded_session("A");
        session.edit("AB", t0);
        let request = session.poll(t0 + ms(2000)).unwrap();

        let done = t0 + ms(2100);
        assert_eq!(
            session.complete_success(request.ticket, done),
            CommitOutcome::Saved
        );
        assert_eq!(session.status_label(), Some("Auto-saved"));
        assert!(!session.is_dirty());

        session.poll(done + ms(1999));
        assert_eq!(session.status(), SaveStatus::Saved);
        session.poll(done + ms(2000));
        assert_eq!(session.status(), SaveStatus::Idle);
        assert_eq!(session.status_label(), None);
    }

    #[test]
    fn edit_during_saved_window_starts_new_dirty_cycle() {
        let t0 = Instant::now();
        let (mut session, _) = loaded_session("A");
        session.edit("AB", t0);
        let request = session.poll(t0 + ms(2000)).unwrap();
        session.complete_success(request.ticket, t0 + ms(2000));

        session.edit("ABC", t0 + ms(2500));
        assert_eq!(session.status(), SaveStatus::Idle);
        assert!(session.is_dirty());
        let next = session.poll(t0 + ms(4500)).unwrap();
        assert_eq!(next.content, "ABC");
    }

    #[test]
    fn manual_save_when_clean_is_unchanged() {
        let (mut session, _) = loaded_session("A");
        assert_eq!(session.manual_save(), ManualSaveOutcome::Unchanged);
        assert!(!session.is_commit_in_flight());
    }

    #[test]
    fn manual_save_cancels_debounce_and_commits_immediately() {
        let t0 = Instant::now();
        let (mut session, _) = loaded_session("A");
        session.edit("AB", t0);

        let ManualSaveOutcome::Started(request) = session.manual_save() else {
            panic!("manual save should start a commit");
        };
        assert_eq!(request.trigger, SaveTrigger::Manual);
        assert!(!session.is_debounce_armed());
        session.complete_success(request.ticket, t0 + ms(10));
        assert_eq!(session.poll(t0 + ms(2000)), None);
    }

    #[test]
    fn manual_save_while_in_flight_is_rejected() {
        let t0 = Instant::now();
        let (mut session, _) = loaded_session("A");
        session.edit("AB", t0);
        let _request = session.poll(t0 + ms(2000)).unwrap();

        session.edit("ABC", t0 + ms(2100));
        assert_eq!(session.manual_save(), ManualSaveOutcome::Busy);
    }

    #[test]
    fn manual_save_without_stored_bio_has_no_target() {
        let mut session = BioEditSession::new(AutosaveTiming::default());
        session.load_remote(None);
        session.edit("draft", Instant::now());
        assert_eq!(session.manual_save(), ManualSaveOutcome::NoTarget);
    }

    #[test]
    fn edits_during_flight_stay_dirty_and_are_committed_next() {
        let t0 = Instant::now();
        let (mut session, _) = loaded_session("A");
        session.edit("AB", t0);
        let first = session.poll(t0 + ms(2000)).unwrap();

        session.edit("ABC", t0 + ms(2100));
        assert_eq!(session.poll(t0 + ms(4100)), None, "deferred while in flight");

        session.complete_success(first.ticket, t0 + ms(4200));
        assert!(session.is_dirty());
        assert_eq!(session.committed(), "AB");

        let second = session.poll(t0 + ms(4200)).expect("deferred autosave fires");
        assert_eq!(second.content, "ABC");
    }

    #[test]
    fn failure_returns_to_idle_without_retry() {
        let t0 = Instant::now();
        let (mut session, _) = loaded_session("A");
        session.edit("ABC", t0);
        let request = session.poll(t0 + ms(2000)).unwrap();

        assert_eq!(
            session.complete_failure(request.ticket),
            CommitOutcome::Failed
        );
        assert_eq!(session.status(), SaveStatus::Idle);
        assert_eq!(session.buffer(), "ABC");
        assert!(session.is_dirty());
        assert_eq!(session.poll(t0 + ms(10_000)), None);
        assert!(matches!(
            session.manual_save(),
            ManualSaveOutcome::Started(_)
        ));
    }

    #[test]
    fn remote_refresh_does_not_clobber_unsaved_edits() {
        let t0 = Instant::now();
        let (mut session, bio) = loaded_session("A");
        session.edit("typing", t0);

        let mut stale = bio.clone();
        stale.content = "server copy".to_string();
        assert!(!session.load_remote(Some(&stale)));
        assert_eq!(session.buffer(), "typing");
    }

    #[test]
    fn remote_refresh_replaces_clean_buffer() {
        let (mut session, bio) = loaded_session("A");
        let mut newer = bio.clone();
        newer.content = "B".to_string();
        assert!(session.load_remote(Some(&newer)));
        assert_eq!(session.buffer(), "B");
        assert_eq!(session.committed(), "B");
    }

    #[test]
    fn close_cancels_timers_and_ignores_late_completion() {
        let t0 = Instant::now();
        let (mut session, _) = loaded_session("A");
        session.edit("AB", t0);
        let request = session.poll(t0 + ms(2000)).unwrap();
        session.edit("ABC", t0 + ms(2100));

        assert!(session.close());
        assert_eq!(session.next_wakeup(), None);
        assert_eq!(
            session.complete_success(request.ticket, t0 + ms(2200)),
            CommitOutcome::Stale
        );
        assert_eq!(session.poll(t0 + ms(9000)), None);
        assert_eq!(session.manual_save(), ManualSaveOutcome::Closed);
    }
}
