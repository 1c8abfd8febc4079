//! Shared roster state and sync scheduling.
//!
//! One orchestrator owns the canonical roster for a process. Refreshes
//! go through [`SyncOrchestrator::sync_now`], which never runs two
//! fetches at once: a caller that arrives while a sync is in flight
//! joins it and receives the same outcome. The roster itself lives in a
//! watch channel and is replaced in a single `send_replace`, so readers
//! observe either the fully-old or the fully-new snapshot.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use roster_core::Roster;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::source::RosterSource;

/// Default auto-sync cadence.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_millis(30_000);

/// Summary of one completed sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub employees: usize,
    pub teams: usize,
    pub date_labels: usize,
    pub completed_at: DateTime<Utc>,
}

/// Sync failure surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("sync failed: {0}")]
    Failed(String),

    #[error("sync interrupted before completion")]
    Interrupted,
}

struct AutoSync {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Owns the shared roster and coordinates refreshes against one source.
pub struct SyncOrchestrator {
    source: Arc<dyn RosterSource>,
    /// Latest fully-assembled roster; swapped wholesale on success.
    roster_tx: watch::Sender<Arc<Roster>>,
    /// Present while a sync is in flight; joiners subscribe for the outcome.
    inflight: Mutex<Option<broadcast::Sender<Result<SyncReport, SyncError>>>>,
    /// At most one timer task at a time.
    auto_sync: Mutex<Option<AutoSync>>,
}

impl SyncOrchestrator {
    pub fn new(source: Arc<dyn RosterSource>) -> Self {
        let (roster_tx, _) = watch::channel(Arc::new(Roster::default()));
        Self {
            source,
            roster_tx,
            inflight: Mutex::new(None),
            auto_sync: Mutex::new(None),
        }
    }

    /// Current roster snapshot.
    pub fn roster(&self) -> Arc<Roster> {
        self.roster_tx.borrow().clone()
    }

    /// Watch receiver that yields each replacement snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Roster>> {
        self.roster_tx.subscribe()
    }

    /// Fetches from the source and swaps the shared roster in one step.
    ///
    /// On failure the previous roster stays in place. Calls that overlap
    /// an in-flight sync do not start a second fetch; they wait for the
    /// running one and return its outcome.
    pub async fn sync_now(&self) -> Result<SyncReport, SyncError> {
        let joined = {
            let mut inflight = self.inflight.lock().await;
            match inflight.as_ref() {
                Some(tx) => Some(tx.subscribe()),
                None => {
                    let (tx, _) = broadcast::channel(8);
                    *inflight = Some(tx);
                    None
                }
            }
        };
        if let Some(mut rx) = joined {
            debug!("joining in-flight sync");
            return match rx.recv().await {
                Ok(outcome) => outcome,
                Err(_) => Err(SyncError::Interrupted),
            };
        }

        let outcome = self.fetch_and_swap().await;

        let tx = self.inflight.lock().await.take();
        if let Some(tx) = tx {
            let _ = tx.send(outcome.clone());
        }
        outcome
    }

    async fn fetch_and_swap(&self) -> Result<SyncReport, SyncError> {
        debug!("syncing roster from {}", self.source.name());
        match self.source.fetch().await {
            Ok(roster) => {
                let report = SyncReport {
                    employees: roster.employee_count(),
                    teams: roster.teams.len(),
                    date_labels: roster.date_labels.len(),
                    completed_at: Utc::now(),
                };
                self.roster_tx.send_replace(Arc::new(roster));
                info!(
                    "roster synced: {} employees across {} teams",
                    report.employees, report.teams
                );
                Ok(report)
            }
            Err(err) => {
                warn!("sync failed, keeping previous roster: {err}");
                Err(SyncError::Failed(err.to_string()))
            }
        }
    }

    /// Starts the periodic sync task, replacing any running one.
    ///
    /// The token only interrupts the wait between ticks; a tick's fetch
    /// always runs to completion.
    pub async fn start_auto_sync(self: &Arc<Self>, interval: Duration) {
        let mut auto_sync = self.auto_sync.lock().await;
        if let Some(prev) = auto_sync.take() {
            prev.cancel.cancel();
            let _ = prev.task.await;
        }
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let orchestrator = Arc::clone(self);
        let task = tokio::spawn(async move {
            info!("auto-sync started, interval {interval:?}");
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
                if let Err(err) = orchestrator.sync_now().await {
                    warn!("auto-sync tick failed: {err}");
                }
            }
            debug!("auto-sync stopped");
        });
        *auto_sync = Some(AutoSync { cancel, task });
    }

    /// Stops the periodic sync task and waits for it to finish.
    pub async fn stop_auto_sync(&self) {
        let mut auto_sync = self.auto_sync.lock().await;
        if let Some(prev) = auto_sync.take() {
            prev.cancel.cancel();
            let _ = prev.task.await;
        }
    }

    pub async fn auto_sync_running(&self) -> bool {
        self.auto_sync.lock().await.is_some()
    }
}
