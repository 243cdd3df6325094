//! Debounced auto-save for the biography editor.
//!
//! # Responsibility
//! - Keep the stored bio eventually consistent with the local buffer.
//! - Coalesce bursts of edits into one commit after a quiet period.
//! - Expose `Idle | Saving | Saved` feedback with `dirty` tracked separately.
//!
//! # Invariants
//! - At most one debounce deadline is armed per session.
//! - At most one commit is in flight per session.
//! - An edit is never dropped: `dirty` is only cleared once the committed
//!   snapshot equals the current buffer.
//! - Time is injected (`Instant`), so every transition is deterministic.
//! - After a failed commit `dirty` stays set only to keep manual save
//!   enabled; it never re-arms the debounce timer.

mod session;
mod synchronizer;
mod timer;

pub use session::{
    AutosaveTiming, BioEditSession, CommitOutcome, CommitRequest, CommitTicket,
    ManualSaveOutcome, SaveStatus, SaveTrigger,
};
pub use synchronizer::{AutoSaveSynchronizer, BioBackend, SaveNow};
pub use timer::DebounceTimer;
