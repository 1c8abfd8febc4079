//! Disk persistence for request records.
//!
//! One JSON file under the roster home directory, written atomically via
//! a `.tmp` sibling so a crash mid-write never corrupts the store.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::ScheduleRequest;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("could not determine the roster home directory")]
    NoHome,

    #[error("unsupported request store schema version {found} (this build reads {SCHEMA_VERSION})")]
    SchemaVersion { found: u32 },
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRequests {
    schema_version: u32,
    requests: Vec<ScheduleRequest>,
}

/// File-backed request store.
#[derive(Debug, Clone)]
pub struct RequestStore {
    path: PathBuf,
}

impl RequestStore {
    pub const FILE_NAME: &'static str = "schedule_requests.json";

    /// Create a store under the roster home directory.
    pub fn new() -> Result<Self, StoreError> {
        let home = roster_core::roster_home().ok_or(StoreError::NoHome)?;
        Self::with_base_dir(home)
    }

    /// Create a store with a custom base directory (for testing).
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self {
            path: base_dir.join(Self::FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all records; a missing file is an empty store.
    pub fn load(&self) -> Result<Vec<ScheduleRequest>, StoreError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no request store at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        let stored: StoredRequests = serde_json::from_str(&data)?;
        if stored.schema_version != SCHEMA_VERSION {
            return Err(StoreError::SchemaVersion {
                found: stored.schema_version,
            });
        }
        Ok(stored.requests)
    }

    /// Saves all records, replacing the file atomically.
    pub fn save(&self, requests: &[ScheduleRequest]) -> Result<(), StoreError> {
        let stored = StoredRequests {
            schema_version: SCHEMA_VERSION,
            requests: requests.to_vec(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
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
    use crate::types::{RequestDetail, RequestStatus};

    fn record(id: &str) -> ScheduleRequest {
        ScheduleRequest {
            id: id.to_string(),
            status: RequestStatus::Pending,
            reason: "appointment".to_string(),
            created_at: "2025-09-01T08:00:00+00:00".to_string(),
            decided_at: None,
            decided_by: None,
            detail: RequestDetail::ShiftChange {
                employee_id: "SLL-1001".to_string(),
                employee_name: "Asha Rao".to_string(),
                team: "Support".to_string(),
                date: "2Sep".to_string(),
                current_shift: "M2".to_string(),
                requested_shift: "D1".to_string(),
            },
        }
    }

    #[test]
    fn round_trips_records() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = RequestStore::with_base_dir(tmp.path()).unwrap();
        let records = vec![record("shift_change_1"), record("shift_change_2")];
        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);
    }

    #[test]
    fn missing_file_loads_empty() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = RequestStore::with_base_dir(tmp.path()).unwrap();
        assert_eq!(store.load().unwrap(), vec![]);
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = RequestStore::with_base_dir(tmp.path()).unwrap();
        store.save(&[record("shift_change_1")]).unwrap();
        let leftover: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftover.is_empty());
    }

    #[test]
    fn unknown_schema_version_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = RequestStore::with_base_dir(tmp.path()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"schema_version": 99, "requests": []}"#,
        )
        .unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::SchemaVersion { found: 99 }));
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = RequestStore::with_base_dir(tmp.path()).unwrap();
        store
            .save(&[record("shift_change_1"), record("shift_change_2")])
            .unwrap();
        store.save(&[record("shift_change_1")]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
