//! Roster synchronization: sources, the shared-state orchestrator and
//! persisted user preferences.

pub mod orchestrator;
pub mod prefs;
pub mod source;

pub use orchestrator::{DEFAULT_SYNC_INTERVAL, SyncError, SyncOrchestrator, SyncReport};
pub use prefs::{Preferences, PrefsError, PrefsStore, SavedIdentity};
pub use source::{BackendSource, RosterSource, SheetCsvSource, SourceError};
