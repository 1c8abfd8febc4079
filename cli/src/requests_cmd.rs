//! `roster requests`: submit, list and decide schedule requests.
//!
//! Requests live in the local request store. Deciding with `--apply`
//! additionally pushes the approved shifts to the backend's admin schedule
//! and records the edits in the local modification log, so the roster and
//! the audit trail stay consistent with the decision.

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use chrono::Utc;
use clap::Parser;
use clap::Subcommand;
use owo_colors::OwoColorize;
use roster_backend_client::BackendClient;
use roster_backend_client::ShiftChangeSubmission;
use roster_backend_client::ShiftSource;
use roster_backend_client::ShiftUpdate;
use roster_backend_client::SwapSubmission;
use roster_core::Roster;
use roster_core::edit;
use roster_core::edit::AppliedEdit;
use roster_core::edit::ModificationLog;
use roster_requests::Decision;
use roster_requests::RequestDetail;
use roster_requests::RequestFilter;
use roster_requests::RequestStatus;
use roster_requests::RequestStore;
use roster_requests::RequestWorkflow;
use roster_requests::ScheduleRequest;
use roster_requests::SubmitShiftChange;
use roster_requests::SubmitSwap;

use crate::mods_cmd;
use crate::session_cmd;

#[derive(Debug, Parser)]
pub struct RequestsCli {
    #[command(subcommand)]
    command: RequestsCommand,
}

#[derive(Debug, Subcommand)]
enum RequestsCommand {
    /// List stored requests.
    List(ListArgs),
    /// Submit a shift change request.
    SubmitChange(SubmitChangeArgs),
    /// Submit a swap request.
    SubmitSwap(SubmitSwapArgs),
    /// Approve or reject a pending request.
    Decide(DecideArgs),
}

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Filter: all, shift-change, swap or pending.
    #[arg(long, default_value = "all")]
    pub filter: String,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct SubmitChangeArgs {
    /// Employee id (default: the saved identity).
    #[arg(long)]
    pub employee: Option<String>,

    /// Date label, e.g. 5Sep.
    #[arg(long)]
    pub date: String,

    /// Requested shift code, e.g. D1.
    #[arg(long)]
    pub shift: String,

    /// Why the change is needed.
    #[arg(long)]
    pub reason: String,

    /// Also queue the request on the backend.
    #[arg(long)]
    pub push: bool,
}

#[derive(Debug, Parser)]
pub struct SubmitSwapArgs {
    /// Requesting employee id (default: the saved identity).
    #[arg(long)]
    pub requester: Option<String>,

    /// Employee to swap with. Omit to list candidates for the date.
    #[arg(long)]
    pub target: Option<String>,

    /// Date label, e.g. 5Sep.
    #[arg(long)]
    pub date: String,

    /// Why the swap is needed.
    #[arg(long, default_value = "")]
    pub reason: String,

    /// Also queue the request on the backend.
    #[arg(long)]
    pub push: bool,
}

#[derive(Debug, Parser)]
pub struct DecideArgs {
    /// Request id, e.g. shift_change_3.
    #[arg(long)]
    pub id: String,

    /// Approve the request.
    #[arg(long, conflicts_with = "reject")]
    pub approve: bool,

    /// Reject the request.
    #[arg(long)]
    pub reject: bool,

    /// Who is deciding (default: the saved identity's name).
    #[arg(long)]
    pub by: Option<String>,

    /// Push an approved request to the backend schedule and log it.
    #[arg(long)]
    pub apply: bool,
}

impl RequestsCli {
    pub async fn run(&self, backend: &str) -> Result<()> {
        match &self.command {
            RequestsCommand::List(args) => cmd_list(args).await,
            RequestsCommand::SubmitChange(args) => cmd_submit_change(backend, args).await,
            RequestsCommand::SubmitSwap(args) => cmd_submit_swap(backend, args).await,
            RequestsCommand::Decide(args) => cmd_decide(backend, args).await,
        }
    }
}

fn parse_filter(raw: &str) -> Result<RequestFilter> {
    match raw {
        "all" => Ok(RequestFilter::All),
        "shift-change" => Ok(RequestFilter::ShiftChange),
        "swap" => Ok(RequestFilter::Swap),
        "pending" => Ok(RequestFilter::Pending),
        other => bail!("unknown filter {other:?}; expected all, shift-change, swap or pending"),
    }
}

async fn cmd_list(args: &ListArgs) -> Result<()> {
    let filter = parse_filter(&args.filter)?;
    let store = RequestStore::new().context("open request store")?;
    let workflow = RequestWorkflow::from_records(store.load()?);
    let requests = workflow.list(filter).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&requests)?);
        return Ok(());
    }
    if requests.is_empty() {
        println!("no requests");
        return Ok(());
    }
    for request in &requests {
        print_request(request);
    }
    let stats = workflow.stats().await;
    println!(
        "\n{} pending, {} approved, {} rejected",
        stats.pending_count, stats.approved_count, stats.rejected_count
    );
    Ok(())
}

async fn cmd_submit_change(backend: &str, args: &SubmitChangeArgs) -> Result<()> {
    let employee_id = match &args.employee {
        Some(id) => id.clone(),
        None => session_cmd::require_identity()?.employee_id,
    };
    let client = BackendClient::new(backend)?;
    let roster = client.display_data().await?.into_roster();

    let store = RequestStore::new().context("open request store")?;
    let workflow = RequestWorkflow::from_records(store.load()?);
    let request = workflow
        .submit_shift_change(
            &roster,
            SubmitShiftChange {
                employee_id,
                date: args.date.clone(),
                requested_shift: args.shift.clone(),
                reason: args.reason.clone(),
            },
        )
        .await?;
    store.save(&workflow.records().await)?;
    println!("{} {} submitted", "ok:".green(), request.id);
    if args.push {
        push_submission(&client, &request).await?;
    }
    Ok(())
}

async fn cmd_submit_swap(backend: &str, args: &SubmitSwapArgs) -> Result<()> {
    let requester_id = match &args.requester {
        Some(id) => id.clone(),
        None => session_cmd::require_identity()?.employee_id,
    };
    let client = BackendClient::new(backend)?;
    let roster = client.display_data().await?.into_roster();

    let Some(target) = &args.target else {
        return list_swap_candidates(&client, &roster, &requester_id, &args.date).await;
    };

    let store = RequestStore::new().context("open request store")?;
    let workflow = RequestWorkflow::from_records(store.load()?);
    let request = workflow
        .submit_swap(
            &roster,
            SubmitSwap {
                requester_id,
                target_id: target.clone(),
                date: args.date.clone(),
                reason: args.reason.clone(),
            },
        )
        .await?;
    store.save(&workflow.records().await)?;
    println!("{} {} submitted", "ok:".green(), request.id);
    if args.push {
        push_submission(&client, &request).await?;
    }
    Ok(())
}

/// Forwards a locally stored request to the backend's request queue so it
/// shows up in the web admin panel as well.
async fn push_submission(client: &BackendClient, request: &ScheduleRequest) -> Result<()> {
    match &request.detail {
        RequestDetail::ShiftChange {
            employee_id,
            employee_name,
            team,
            date,
            current_shift,
            requested_shift,
        } => {
            client
                .submit_shift_change(&ShiftChangeSubmission {
                    employee_id: employee_id.clone(),
                    employee_name: employee_name.clone(),
                    team: team.clone(),
                    date: date.clone(),
                    current_shift: current_shift.clone(),
                    requested_shift: requested_shift.clone(),
                    reason: request.reason.clone(),
                })
                .await?;
        }
        RequestDetail::Swap {
            requester_id,
            requester_name,
            target_id,
            target_name,
            team,
            date,
            requester_shift,
            target_shift,
        } => {
            client
                .submit_swap(&SwapSubmission {
                    requester_id: requester_id.clone(),
                    requester_name: requester_name.clone(),
                    target_employee_id: target_id.clone(),
                    target_employee_name: target_name.clone(),
                    team: team.clone(),
                    date: date.clone(),
                    requester_shift: requester_shift.clone(),
                    target_shift: target_shift.clone(),
                    reason: request.reason.clone(),
                })
                .await?;
        }
    }
    println!("  queued on the backend");
    Ok(())
}

async fn list_swap_candidates(
    client: &BackendClient,
    roster: &Roster,
    requester_id: &str,
    date: &str,
) -> Result<()> {
    let Some(requester) = roster.find_employee(requester_id) else {
        bail!("employee {requester_id} not found in the roster");
    };
    let members = client
        .team_members(&requester.team, &requester.id, date)
        .await?;
    if members.is_empty() {
        println!("no swap candidates in {} on {date}", requester.team);
        return Ok(());
    }
    println!(
        "swap candidates in {} on {date}; rerun with --target ID:",
        requester.team
    );
    for member in &members {
        println!(
            "  {:<10} {:<24} {}",
            member.id, member.name, member.shift_display
        );
    }
    Ok(())
}

async fn cmd_decide(backend: &str, args: &DecideArgs) -> Result<()> {
    let decision = match (args.approve, args.reject) {
        (true, false) => Decision::Approve,
        (false, true) => Decision::Reject,
        _ => bail!("pass exactly one of --approve or --reject"),
    };
    let decided_by = match &args.by {
        Some(name) => name.clone(),
        None => session_cmd::require_identity()
            .map(|identity| identity.full_name)
            .unwrap_or_else(|_| "admin".to_string()),
    };

    let store = RequestStore::new().context("open request store")?;
    let workflow = RequestWorkflow::from_records(store.load()?);
    let request = workflow.decide(&args.id, decision, &decided_by).await?;
    store.save(&workflow.records().await)?;
    println!(
        "{} {} {}",
        "ok:".green(),
        request.id,
        colored_status(request.status)
    );

    if args.apply && request.status == RequestStatus::Approved {
        apply_request(backend, &request, &decided_by).await?;
    }
    Ok(())
}

/// Pushes an approved request's shifts through the backend's admin
/// schedule. Swaps are two writes, one per side, using the shifts that
/// were snapshotted at submission time.
async fn apply_request(backend: &str, request: &ScheduleRequest, decided_by: &str) -> Result<()> {
    let client = BackendClient::new(backend)?;
    let mut admin = client.admin_data().await?.into_roster();
    let google = client.google_data().await?.into_roster();

    let date = request.detail.date();
    let Some(date_index) = admin.label_index(date) else {
        bail!("date {date} is not in the admin roster");
    };

    let legs: Vec<(String, String)> = match &request.detail {
        RequestDetail::ShiftChange {
            employee_id,
            requested_shift,
            ..
        } => vec![(employee_id.clone(), requested_shift.clone())],
        RequestDetail::Swap {
            requester_id,
            target_id,
            requester_shift,
            target_shift,
            ..
        } => vec![
            (requester_id.clone(), target_shift.clone()),
            (target_id.clone(), requester_shift.clone()),
        ],
    };

    let mut log = mods_cmd::load_log()?;
    let mut push = ShiftPush {
        client: &client,
        google: &google,
        log: &mut log,
        modified_by: decided_by,
    };
    for (employee_id, new_shift) in &legs {
        let applied = push.apply(&mut admin, employee_id, date_index, new_shift).await?;
        println!(
            "  applied: {} {} -> {} on {}",
            applied.employee_name, applied.old_shift, applied.new_shift, applied.date_label
        );
    }
    mods_cmd::save_log(&log)?;
    Ok(())
}

/// Applies one admin schedule edit end to end: local roster, backend,
/// modification log.
pub(crate) struct ShiftPush<'a> {
    pub client: &'a BackendClient,
    pub google: &'a Roster,
    pub log: &'a mut ModificationLog,
    pub modified_by: &'a str,
}

impl ShiftPush<'_> {
    pub async fn apply(
        &mut self,
        admin: &mut Roster,
        employee_id: &str,
        date_index: usize,
        new_shift: &str,
    ) -> Result<AppliedEdit> {
        let applied = edit::set_shift(admin, employee_id, date_index, new_shift)?;
        let google_shift = self
            .google
            .find_employee(employee_id)
            .and_then(|employee| employee.schedule.get(date_index))
            .cloned();
        self.client
            .update_shift(&ShiftUpdate {
                employee_id: employee_id.to_string(),
                date_index,
                new_shift: applied.new_shift.clone(),
                source: ShiftSource::Admin,
                google_shift,
            })
            .await?;
        self.log.record(&applied, self.modified_by, Utc::now());
        Ok(applied)
    }
}

fn detail_summary(detail: &RequestDetail) -> String {
    match detail {
        RequestDetail::ShiftChange {
            employee_name,
            date,
            current_shift,
            requested_shift,
            ..
        } => format!("{employee_name}: {date} {current_shift} -> {requested_shift}"),
        RequestDetail::Swap {
            requester_name,
            target_name,
            date,
            requester_shift,
            target_shift,
            ..
        } => format!(
            "{requester_name} ({requester_shift}) <-> {target_name} ({target_shift}) on {date}"
        ),
    }
}

pub(crate) fn print_request(request: &ScheduleRequest) {
    println!(
        "  {:<16} [{}] {} ({})",
        request.id,
        colored_status(request.status),
        detail_summary(&request.detail),
        request.reason
    );
}

fn colored_status(status: RequestStatus) -> String {
    match status {
        RequestStatus::Pending => status.as_str().yellow().to_string(),
        RequestStatus::Approved => status.as_str().green().to_string(),
        RequestStatus::Rejected => status.as_str().red().to_string(),
    }
}
