//! `roster sync`: refresh the shared roster once or keep it refreshed.
//!
//! With no flags this runs a single sync against the backend and prints a
//! report. `--sheet-url` swaps the source for published sheet CSVs, and
//! `--watch` keeps the orchestrator's timer running until Ctrl-C, printing
//! a line whenever the shared roster is replaced.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use chrono::Local;
use clap::Parser;
use owo_colors::OwoColorize;
use roster_backend_client::BackendClient;
use roster_sync::BackendSource;
use roster_sync::PrefsStore;
use roster_sync::RosterSource;
use roster_sync::SheetCsvSource;
use roster_sync::SyncOrchestrator;
use roster_sync::SyncReport;
use tracing::debug;

/// Floor for the watch timer so a stray preference cannot hammer the
/// backend.
const MIN_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Parser)]
pub struct SyncArgs {
    /// Published sheet CSV URLs to merge, instead of the backend.
    #[arg(long = "sheet-url")]
    pub sheet_urls: Vec<String>,

    /// Keep syncing on a timer until interrupted.
    #[arg(long)]
    pub watch: bool,

    /// Timer interval in milliseconds (persisted as the new default).
    #[arg(long = "interval-ms")]
    pub interval_ms: Option<u64>,

    /// Disable the periodic timer and persist that choice.
    #[arg(long = "no-auto", conflicts_with = "watch")]
    pub no_auto: bool,
}

pub async fn cmd_sync(backend: &str, args: &SyncArgs) -> Result<()> {
    let prefs_store = PrefsStore::new().context("open preferences")?;
    let mut prefs = prefs_store.load().context("load preferences")?;

    let mut dirty = false;
    if let Some(ms) = args.interval_ms {
        prefs.sync_interval_ms = ms;
        dirty = true;
    }
    if args.no_auto && prefs.auto_sync {
        prefs.auto_sync = false;
        dirty = true;
    }
    if args.watch && !prefs.auto_sync {
        prefs.auto_sync = true;
        dirty = true;
    }
    if dirty {
        prefs_store.save(&prefs).context("save preferences")?;
    }

    let source: Arc<dyn RosterSource> = if args.sheet_urls.is_empty() {
        Arc::new(BackendSource::new(BackendClient::new(backend)?))
    } else {
        Arc::new(SheetCsvSource::new(args.sheet_urls.clone())?)
    };
    debug!("syncing from {}", source.name());
    let orchestrator = Arc::new(SyncOrchestrator::new(source));

    let report = orchestrator.sync_now().await?;
    print_report(&report);

    if !args.watch {
        return Ok(());
    }

    let interval_ms = prefs.sync_interval_ms.max(MIN_INTERVAL_MS);
    let mut updates = orchestrator.subscribe();
    orchestrator
        .start_auto_sync(Duration::from_millis(interval_ms))
        .await;
    println!("watching; syncing every {interval_ms}ms, Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let roster = updates.borrow_and_update().clone();
                println!(
                    "{} resynced: {} employees, {} teams",
                    Local::now().format("%H:%M:%S"),
                    roster.employee_count(),
                    roster.teams.len()
                );
            }
        }
    }
    orchestrator.stop_auto_sync().await;
    println!("stopped");
    Ok(())
}

fn print_report(report: &SyncReport) {
    println!(
        "{} {} employees, {} teams, {} dates",
        "synced:".green(),
        report.employees,
        report.teams,
        report.date_labels
    );
}
