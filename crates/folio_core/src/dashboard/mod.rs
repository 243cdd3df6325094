//! Dashboard session state: the controllers behind each management view.
//!
//! # Responsibility
//! - Hold editor-local transient state (buffers, selections, form modes).
//! - Drive the entity store and the notification surface on operator actions.
//!
//! # Invariants
//! - Session state is owned by one active view and discarded on teardown.
//! - Store failures are reported through the injected `Notifier`, never
//!   propagated as panics.

pub mod autosave;
pub mod editor;
pub mod inbox;
pub mod portfolio;

pub use autosave::{
    AutoSaveSynchronizer, AutosaveTiming, BioBackend, BioEditSession, SaveNow, SaveStatus,
};
pub use editor::{EditorMode, EntityEditor, ProfileEditor};
pub use inbox::{InboxBackend, InboxManager};
pub use portfolio::PortfolioManager;
