//! `roster mods`: the shift modification log.
//!
//! Edits applied through this tool land in a local `modified_shifts.json`
//! under the roster home directory; `--remote` reads the backend's own log
//! instead, which covers edits made through the web admin panel.

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use chrono::Local;
use clap::Parser;
use roster_backend_client::BackendClient;
use roster_core::edit::ModificationLog;
use roster_core::shift_code::display_label;
use tracing::debug;

const FILE_NAME: &str = "modified_shifts.json";
const RECENT_LIMIT: usize = 50;

#[derive(Debug, Parser)]
pub struct ModsArgs {
    /// Month to summarize, as YYYY-MM (default: the current month).
    #[arg(long)]
    pub month: Option<String>,

    /// Read the backend's log instead of the local one.
    #[arg(long)]
    pub remote: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub async fn cmd_mods(backend: &str, args: &ModsArgs) -> Result<()> {
    if args.remote {
        return cmd_mods_remote(backend, args).await;
    }

    let month = match &args.month {
        Some(month) => month.clone(),
        None => Local::now().format("%Y-%m").to_string(),
    };
    let log = load_log()?;
    let stats = log.monthly_stats(&month);
    let recent = log.recent(RECENT_LIMIT);

    if args.json {
        let payload = serde_json::json!({
            "month": month,
            "stats": stats,
            "recent": recent,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "{month}: {} modifications, {} employees touched",
        stats.total_modifications, stats.employees_modified
    );
    let mut by_user: Vec<_> = stats.modifications_by_user.iter().collect();
    by_user.sort();
    for (user, count) in by_user {
        println!("  {user}: {count}");
    }
    if !recent.is_empty() {
        println!("\nRecent:");
        for entry in recent {
            println!(
                "  {} {} {} -> {} ({}, by {})",
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                entry.employee_name,
                display_label(&entry.old_shift),
                display_label(&entry.new_shift),
                entry.date_label,
                entry.modified_by
            );
        }
    }
    Ok(())
}

async fn cmd_mods_remote(backend: &str, args: &ModsArgs) -> Result<()> {
    if args.month.is_some() {
        bail!("--month only applies to the local log; the backend reports the current month");
    }
    let client = BackendClient::new(backend)?;
    let report = client.modified_shifts().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{}: {} modifications, {} employees touched",
        report.current_month,
        report.monthly_stats.total_modifications,
        report.monthly_stats.employees_modified.len()
    );
    let mut by_user: Vec<_> = report.monthly_stats.modifications_by_user.iter().collect();
    by_user.sort();
    for (user, count) in by_user {
        println!("  {user}: {count}");
    }
    if !report.recent_modifications.is_empty() {
        println!("\nRecent:");
        for entry in &report.recent_modifications {
            println!(
                "  {} {} {} -> {} ({}, by {})",
                entry.timestamp,
                entry.employee_name,
                display_label(&entry.old_shift),
                display_label(&entry.new_shift),
                entry.date_header,
                entry.modified_by
            );
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Local log persistence, shared with the commands that record edits.
// ────────────────────────────────────────────────────────────────────────────

fn log_path() -> Result<PathBuf> {
    let home = roster_core::roster_home()
        .context("could not determine the roster home directory")?;
    std::fs::create_dir_all(&home).with_context(|| format!("create {}", home.display()))?;
    Ok(home.join(FILE_NAME))
}

pub fn load_log() -> Result<ModificationLog> {
    let path = log_path()?;
    match std::fs::read_to_string(&path) {
        Ok(data) => {
            serde_json::from_str(&data).with_context(|| format!("parse {}", path.display()))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("no modification log at {}", path.display());
            Ok(ModificationLog::default())
        }
        Err(err) => Err(err).with_context(|| format!("read {}", path.display())),
    }
}

pub fn save_log(log: &ModificationLog) -> Result<()> {
    let path = log_path()?;
    let json = serde_json::to_string_pretty(log)?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, &path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}
