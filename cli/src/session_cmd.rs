//! Saved-identity commands: `roster login`, `roster logout`, `roster whoami`.
//!
//! The identity lives in the preferences file and fills in the employee id
//! for commands that take one, so regular use is `roster login` once and
//! then `roster dashboard` with no flags.

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use chrono::Utc;
use clap::Parser;
use owo_colors::OwoColorize;
use roster_core::model::is_valid_employee_id;
use roster_sync::PrefsStore;
use roster_sync::SavedIdentity;

#[derive(Debug, Parser)]
pub struct LoginArgs {
    /// Your full name, as it appears on the roster.
    #[arg(long)]
    pub name: String,

    /// Your employee id, e.g. SLL-1001.
    #[arg(long)]
    pub id: String,
}

#[derive(Debug, Parser)]
pub struct WhoamiArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn cmd_login(args: &LoginArgs) -> Result<()> {
    let name = args.name.trim();
    let id = args.id.trim().to_uppercase();
    if name.is_empty() {
        bail!("a name is required");
    }
    if !is_valid_employee_id(&id) {
        bail!("invalid employee id {id:?}; expected the SLL-<number> form");
    }

    let store = PrefsStore::new().context("open preferences")?;
    let mut prefs = store.load().context("load preferences")?;
    prefs.identity = Some(SavedIdentity {
        full_name: name.to_string(),
        employee_id: id.clone(),
        saved_at: Utc::now().to_rfc3339(),
    });
    store.save(&prefs).context("save preferences")?;
    println!("{} logged in as {name} ({id})", "ok:".green());
    Ok(())
}

pub fn cmd_logout() -> Result<()> {
    let store = PrefsStore::new().context("open preferences")?;
    let mut prefs = store.load().context("load preferences")?;
    if prefs.identity.take().is_none() {
        println!("no saved identity");
        return Ok(());
    }
    store.save(&prefs).context("save preferences")?;
    println!("{} identity cleared", "ok:".green());
    Ok(())
}

pub fn cmd_whoami(args: &WhoamiArgs) -> Result<()> {
    let store = PrefsStore::new().context("open preferences")?;
    let prefs = store.load().context("load preferences")?;
    match prefs.identity {
        Some(identity) if args.json => {
            println!("{}", serde_json::to_string_pretty(&identity)?);
        }
        Some(identity) => {
            println!("{} ({})", identity.full_name, identity.employee_id);
        }
        None if args.json => println!("null"),
        None => println!("not logged in; run `roster login --name NAME --id SLL-N`"),
    }
    Ok(())
}

/// Returns the saved identity, or an error telling the user how to provide
/// one. Commands that accept an explicit id flag fall back to this.
pub fn require_identity() -> Result<SavedIdentity> {
    let store = PrefsStore::new().context("open preferences")?;
    let prefs = store.load().context("load preferences")?;
    prefs.identity.ok_or_else(|| {
        anyhow::anyhow!("no saved identity; run `roster login` or pass an explicit employee id")
    })
}
