//! `roster admin`: operations against the backend's admin API.
//!
//! These are the command-line counterparts of the web admin panel: editing
//! the admin schedule, managing teams, employees and sheet links, driving
//! sheet syncs and deciding queued schedule requests on the backend.

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap::Subcommand;
use owo_colors::OwoColorize;
use roster_backend_client::Ack;
use roster_backend_client::BackendClient;
use roster_backend_client::SaveAction;
use roster_backend_client::SaveEmployee;
use roster_core::model::is_valid_employee_id;
use roster_core::shift_code::display_label;
use roster_requests::RequestStatus;

use crate::mods_cmd;
use crate::requests_cmd;
use crate::requests_cmd::ShiftPush;
use crate::session_cmd;

#[derive(Debug, Parser)]
pub struct AdminCli {
    #[command(subcommand)]
    command: AdminCommand,
}

#[derive(Debug, Subcommand)]
enum AdminCommand {
    /// Re-sync the backend from its configured sheet links.
    SyncSheets,
    /// Discard admin edits in favor of the synced schedule.
    Reset(ResetArgs),
    /// Set one cell of the admin schedule.
    SetShift(SetShiftArgs),
    /// Team management.
    Team(TeamCli),
    /// Employee management.
    Employee(EmployeeCli),
    /// Published sheet links configured on the backend.
    Links(LinksCli),
    /// Upload a roster export CSV to the backend.
    Upload(UploadArgs),
    /// Pending schedule requests queued on the backend.
    Pending(PendingArgs),
    /// Decide a schedule request queued on the backend.
    Decide(AdminDecideArgs),
}

#[derive(Debug, Parser)]
pub struct ResetArgs {
    /// Skip the confirmation.
    #[arg(long)]
    pub yes: bool,
}

#[derive(Debug, Parser)]
pub struct SetShiftArgs {
    /// Employee id.
    #[arg(long)]
    pub employee: String,

    /// Date label, e.g. 5Sep.
    #[arg(long)]
    pub date: String,

    /// New shift code; an empty string clears the cell.
    #[arg(long)]
    pub shift: String,

    /// Who is editing (default: the saved identity's name).
    #[arg(long)]
    pub by: Option<String>,
}

#[derive(Debug, Parser)]
pub struct TeamCli {
    #[command(subcommand)]
    command: TeamCommand,
}

#[derive(Debug, Subcommand)]
enum TeamCommand {
    /// Create an empty team.
    Add { name: String },
    /// Delete a team and everyone in it.
    Remove {
        name: String,
        /// Skip the confirmation.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Parser)]
pub struct EmployeeCli {
    #[command(subcommand)]
    command: EmployeeCommand,
}

#[derive(Debug, Subcommand)]
enum EmployeeCommand {
    /// Add an employee to a team.
    Add(EmployeeAddArgs),
    /// Change an employee's name, id or team.
    Edit(EmployeeEditArgs),
    /// Remove an employee.
    Remove {
        /// Employee id.
        id: String,
    },
}

#[derive(Debug, Parser)]
pub struct EmployeeAddArgs {
    /// Employee id, e.g. SLL-1001.
    #[arg(long)]
    pub id: String,

    /// Full name.
    #[arg(long)]
    pub name: String,

    /// Team to add them to.
    #[arg(long)]
    pub team: String,
}

#[derive(Debug, Parser)]
pub struct EmployeeEditArgs {
    /// Current employee id.
    #[arg(long)]
    pub id: String,

    /// New full name.
    #[arg(long)]
    pub name: Option<String>,

    /// New employee id.
    #[arg(long = "new-id")]
    pub new_id: Option<String>,

    /// New team.
    #[arg(long)]
    pub team: Option<String>,
}

#[derive(Debug, Parser)]
pub struct LinksCli {
    #[command(subcommand)]
    command: LinksCommand,
}

#[derive(Debug, Subcommand)]
enum LinksCommand {
    /// List the configured links.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Add or replace the link for one month.
    Set {
        /// Month key, e.g. September2025.
        #[arg(long)]
        month: String,

        /// Published CSV URL.
        #[arg(long)]
        url: String,
    },
    /// Remove the link for one month.
    Remove {
        /// Month key, e.g. September2025.
        #[arg(long)]
        month: String,
    },
}

#[derive(Debug, Parser)]
pub struct UploadArgs {
    /// CSV file to upload.
    pub file: PathBuf,
}

#[derive(Debug, Parser)]
pub struct PendingArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct AdminDecideArgs {
    /// Request id, e.g. shift_change_3.
    #[arg(long)]
    pub id: String,

    /// Approve the request.
    #[arg(long, conflicts_with = "reject")]
    pub approve: bool,

    /// Reject the request.
    #[arg(long)]
    pub reject: bool,
}

impl AdminCli {
    pub async fn run(&self, backend: &str) -> Result<()> {
        match &self.command {
            AdminCommand::SyncSheets => cmd_sync_sheets(backend).await,
            AdminCommand::Reset(args) => cmd_reset(backend, args).await,
            AdminCommand::SetShift(args) => cmd_set_shift(backend, args).await,
            AdminCommand::Team(cmd) => cmd_team(backend, cmd).await,
            AdminCommand::Employee(cmd) => cmd_employee(backend, cmd).await,
            AdminCommand::Links(cmd) => cmd_links(backend, cmd).await,
            AdminCommand::Upload(args) => cmd_upload(backend, args).await,
            AdminCommand::Pending(args) => cmd_pending(backend, args).await,
            AdminCommand::Decide(args) => cmd_decide(backend, args).await,
        }
    }
}

async fn cmd_sync_sheets(backend: &str) -> Result<()> {
    let client = BackendClient::new(backend)?;
    let ack = client.sync_google_sheets().await?;
    print_ack(&ack, "sheets synced");
    Ok(())
}

async fn cmd_reset(backend: &str, args: &ResetArgs) -> Result<()> {
    if !args.yes {
        bail!("this discards every admin edit; rerun with --yes");
    }
    let client = BackendClient::new(backend)?;
    let ack = client.reset_to_google().await?;
    print_ack(&ack, "admin schedule reset to the synced data");
    Ok(())
}

async fn cmd_set_shift(backend: &str, args: &SetShiftArgs) -> Result<()> {
    let modified_by = match &args.by {
        Some(name) => name.clone(),
        None => session_cmd::require_identity()
            .map(|identity| identity.full_name)
            .unwrap_or_else(|_| "admin".to_string()),
    };

    let client = BackendClient::new(backend)?;
    let mut admin = client.admin_data().await?.into_roster();
    let google = client.google_data().await?.into_roster();
    let Some(date_index) = admin.label_index(&args.date) else {
        bail!("date {} is not in the roster", args.date);
    };

    let mut log = mods_cmd::load_log()?;
    let mut push = ShiftPush {
        client: &client,
        google: &google,
        log: &mut log,
        modified_by: &modified_by,
    };
    let applied = push
        .apply(&mut admin, &args.employee, date_index, &args.shift)
        .await?;
    mods_cmd::save_log(&log)?;
    println!(
        "{} {}: {} -> {} on {}",
        "ok:".green(),
        applied.employee_name,
        display_label(&applied.old_shift),
        display_label(&applied.new_shift),
        applied.date_label
    );
    Ok(())
}

async fn cmd_team(backend: &str, cli: &TeamCli) -> Result<()> {
    let client = BackendClient::new(backend)?;
    match &cli.command {
        TeamCommand::Add { name } => {
            let ack = client.save_team(name, SaveAction::Add).await?;
            print_ack(&ack, "team added");
        }
        TeamCommand::Remove { name, yes } => {
            if !yes {
                bail!("removing a team deletes its employees; rerun with --yes");
            }
            let ack = client.delete_team(name).await?;
            print_ack(&ack, "team removed");
        }
    }
    Ok(())
}

async fn cmd_employee(backend: &str, cli: &EmployeeCli) -> Result<()> {
    let client = BackendClient::new(backend)?;
    match &cli.command {
        EmployeeCommand::Add(args) => {
            let id = args.id.trim().to_uppercase();
            if !is_valid_employee_id(&id) {
                bail!("invalid employee id {id:?}; expected the SLL-<number> form");
            }
            let ack = client
                .save_employee(&SaveEmployee {
                    name: args.name.clone(),
                    id,
                    team: args.team.clone(),
                    action: SaveAction::Add,
                    old_id: None,
                    old_team: None,
                })
                .await?;
            print_ack(&ack, "employee added");
        }
        EmployeeCommand::Edit(args) => {
            let roster = client.admin_data().await?.into_roster();
            let Some(current) = roster.find_employee(&args.id) else {
                bail!("employee {} not found in the roster", args.id);
            };
            if let Some(new_id) = &args.new_id
                && !is_valid_employee_id(new_id)
            {
                bail!("invalid employee id {new_id:?}; expected the SLL-<number> form");
            }
            let ack = client
                .save_employee(&SaveEmployee {
                    name: args.name.clone().unwrap_or_else(|| current.name.clone()),
                    id: args.new_id.clone().unwrap_or_else(|| args.id.clone()),
                    team: args.team.clone().unwrap_or_else(|| current.team.clone()),
                    action: SaveAction::Edit,
                    old_id: Some(args.id.clone()),
                    old_team: Some(current.team.clone()),
                })
                .await?;
            print_ack(&ack, "employee updated");
        }
        EmployeeCommand::Remove { id } => {
            let ack = client.delete_employee(id).await?;
            print_ack(&ack, "employee removed");
        }
    }
    Ok(())
}

async fn cmd_links(backend: &str, cli: &LinksCli) -> Result<()> {
    let client = BackendClient::new(backend)?;
    match &cli.command {
        LinksCommand::List { json } => {
            let links = client.google_links().await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&links)?);
            } else if links.is_empty() {
                println!("no sheet links configured");
            } else {
                for (month, url) in &links {
                    println!("  {month}: {url}");
                }
            }
        }
        LinksCommand::Set { month, url } => {
            let ack = client.save_google_link(month, url).await?;
            print_ack(&ack, "link saved");
        }
        LinksCommand::Remove { month } => {
            let ack = client.delete_google_link(month).await?;
            print_ack(&ack, "link removed");
        }
    }
    Ok(())
}

async fn cmd_upload(backend: &str, args: &UploadArgs) -> Result<()> {
    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "roster.csv".to_string());
    let contents =
        std::fs::read(&args.file).with_context(|| format!("read {}", args.file.display()))?;

    let client = BackendClient::new(backend)?;
    let ack = client.upload_csv(&file_name, contents).await?;
    print_ack(&ack, "roster uploaded");
    Ok(())
}

async fn cmd_pending(backend: &str, args: &PendingArgs) -> Result<()> {
    let client = BackendClient::new(backend)?;
    let pending = client.pending_requests().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&pending)?);
        return Ok(());
    }
    if pending.pending_requests.is_empty() {
        println!("no pending requests");
        return Ok(());
    }
    for request in &pending.pending_requests {
        requests_cmd::print_request(request);
    }
    println!(
        "\n{} pending, {} approved, {} rejected",
        pending.stats.pending_count, pending.stats.approved_count, pending.stats.rejected_count
    );
    Ok(())
}

async fn cmd_decide(backend: &str, args: &AdminDecideArgs) -> Result<()> {
    let status = match (args.approve, args.reject) {
        (true, false) => RequestStatus::Approved,
        (false, true) => RequestStatus::Rejected,
        _ => bail!("pass exactly one of --approve or --reject"),
    };
    let client = BackendClient::new(backend)?;
    let ack = client.update_request_status(&args.id, status).await?;
    print_ack(&ack, &format!("request {}", status.as_str()));
    Ok(())
}

fn print_ack(ack: &Ack, fallback: &str) {
    let message = ack.message.as_deref().unwrap_or(fallback);
    println!("{} {message}", "ok:".green());
}
