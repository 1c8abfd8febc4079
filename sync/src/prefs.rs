//! Persisted user preferences.
//!
//! Remembers who is using the dashboard and how the auto-sync timer is
//! configured, so the tools come up with the same identity and cadence
//! next session. Same file discipline as the request store: one JSON
//! file under the roster home, atomic replace on save.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::orchestrator::DEFAULT_SYNC_INTERVAL;

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("could not determine the roster home directory")]
    NoHome,
}

/// Identity remembered between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedIdentity {
    pub full_name: String,
    pub employee_id: String,
    pub saved_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub identity: Option<SavedIdentity>,

    #[serde(default = "default_auto_sync")]
    pub auto_sync: bool,

    #[serde(default = "default_sync_interval_ms")]
    pub sync_interval_ms: u64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            identity: None,
            auto_sync: default_auto_sync(),
            sync_interval_ms: default_sync_interval_ms(),
        }
    }
}

fn default_auto_sync() -> bool {
    true
}

fn default_sync_interval_ms() -> u64 {
    DEFAULT_SYNC_INTERVAL.as_millis() as u64
}

/// File-backed preferences store.
#[derive(Debug, Clone)]
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    pub const FILE_NAME: &'static str = "preferences.json";

    /// Create a store under the roster home directory.
    pub fn new() -> Result<Self, PrefsError> {
        let home = roster_core::roster_home().ok_or(PrefsError::NoHome)?;
        Self::with_base_dir(home)
    }

    /// Create a store with a custom base directory (for testing).
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self {
            path: base_dir.join(Self::FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads preferences; a missing file is the defaults.
    pub fn load(&self) -> Result<Preferences, PrefsError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no preferences at {}", self.path.display());
                return Ok(Preferences::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&data)?)
    }

    /// Saves preferences, replacing the file atomically.
    pub fn save(&self, prefs: &Preferences) -> Result<(), PrefsError> {
        let json = serde_json::to_string_pretty(prefs)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = PrefsStore::with_base_dir(tmp.path()).unwrap();
        let prefs = store.load().unwrap();
        assert_eq!(prefs, Preferences::default());
        assert!(prefs.auto_sync);
        assert_eq!(prefs.sync_interval_ms, 30_000);
    }

    #[test]
    fn round_trips_identity() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = PrefsStore::with_base_dir(tmp.path()).unwrap();
        let prefs = Preferences {
            identity: Some(SavedIdentity {
                full_name: "Asha Rao".to_string(),
                employee_id: "SLL-1001".to_string(),
                saved_at: "2025-09-01T08:00:00+00:00".to_string(),
            }),
            auto_sync: false,
            sync_interval_ms: 5_000,
        };
        store.save(&prefs).unwrap();
        assert_eq!(store.load().unwrap(), prefs);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = PrefsStore::with_base_dir(tmp.path()).unwrap();
        std::fs::write(store.path(), r#"{"auto_sync": false}"#).unwrap();
        let prefs = store.load().unwrap();
        assert!(!prefs.auto_sync);
        assert_eq!(prefs.identity, None);
        assert_eq!(prefs.sync_interval_ms, 30_000);
    }
}
