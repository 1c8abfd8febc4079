//! Roster viewing commands: parse local exports, generate templates and
//! render the backend's roster, dashboard and divergence views.

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use chrono::Datelike;
use chrono::Local;
use clap::Parser;
use owo_colors::OwoColorize;
use roster_backend_client::BackendClient;
use roster_core::Roster;
use roster_core::Team;
use roster_core::dates;
use roster_core::diff;
use roster_core::diff::ScheduleDivergence;
use roster_core::merge;
use roster_core::overview;
use roster_core::parser;
use roster_core::shift_code::display_label;

use crate::session_cmd;

#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// Roster export files, merged in the order given.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output the merged roster as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct TemplateArgs {
    /// Month to generate, as YYYY-MM (default: the current month).
    #[arg(long)]
    pub month: Option<String>,

    /// Write to a file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Only this team.
    #[arg(long)]
    pub team: Option<String>,

    /// Only this employee, with their full schedule.
    #[arg(long)]
    pub employee: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct DashboardArgs {
    /// Employee id (default: the saved identity).
    #[arg(long)]
    pub employee: Option<String>,

    /// Window in days for the shift and change views.
    #[arg(long, default_value_t = overview::SHIFT_WINDOW_DAYS)]
    pub days: u32,
}

#[derive(Debug, Parser)]
pub struct DiffArgs {
    /// Employee id.
    #[arg(long)]
    pub employee: String,

    /// Single date label to check, e.g. 5Sep.
    #[arg(long, conflicts_with = "days")]
    pub date: Option<String>,

    /// Window in days starting today.
    #[arg(long, default_value_t = overview::SHIFT_WINDOW_DAYS)]
    pub days: u32,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// parse / template
// ────────────────────────────────────────────────────────────────────────────

pub fn cmd_parse(args: &ParseArgs) -> Result<()> {
    let mut fragments = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        let fragment = parser::parse_roster_csv(&text)
            .with_context(|| format!("parse {}", path.display()))?;
        fragments.push(fragment);
    }
    let roster = merge::merge_fragments(&fragments);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&roster)?);
        return Ok(());
    }
    print_roster_summary(&roster);
    Ok(())
}

pub fn cmd_template(args: &TemplateArgs) -> Result<()> {
    let (year, month) = match &args.month {
        Some(raw) => parse_month_key(raw)?,
        None => {
            let today = Local::now().date_naive();
            (today.year(), today.month())
        }
    };
    let labels = dates::labels_for_month(year, month);
    if labels.is_empty() {
        bail!("{year}-{month:02} is not a valid month");
    }

    let csv = parser::template_csv(&labels);
    match &args.out {
        Some(path) => {
            std::fs::write(path, &csv).with_context(|| format!("write {}", path.display()))?;
            println!("template for {year}-{month:02} written to {}", path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn parse_month_key(raw: &str) -> Result<(i32, u32)> {
    let parsed = raw.split_once('-').and_then(|(year, month)| {
        Some((year.parse::<i32>().ok()?, month.parse::<u32>().ok()?))
    });
    match parsed {
        Some((year, month)) if (1..=12).contains(&month) => Ok((year, month)),
        _ => bail!("invalid month {raw:?}; expected YYYY-MM"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// show
// ────────────────────────────────────────────────────────────────────────────

pub async fn cmd_show(backend: &str, args: &ShowArgs) -> Result<()> {
    let client = BackendClient::new(backend)?;
    let roster = client.display_data().await?.into_roster();

    if let Some(id) = &args.employee {
        return show_employee(&roster, id, args.json);
    }

    let teams: Vec<&Team> = match &args.team {
        Some(name) => {
            let Some(team) = roster.team(name) else {
                let known: Vec<&str> = roster.teams.iter().map(|t| t.name.as_str()).collect();
                bail!("team {name:?} not found; teams: {}", known.join(", "));
            };
            vec![team]
        }
        None => roster.teams.iter().collect(),
    };

    if args.json {
        if args.team.is_some() {
            println!("{}", serde_json::to_string_pretty(&teams)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&roster)?);
        }
        return Ok(());
    }

    print_roster_summary(&roster);
    let today_index = roster.label_index(&dates::label_for_date(Local::now().date_naive()));
    for team in teams {
        println!("\n{}", team.name.bold());
        for employee in &team.employees {
            let today = match today_index.and_then(|index| employee.schedule.get(index)) {
                Some(cell) => display_label(cell),
                None => "-",
            };
            println!("  {:<10} {:<24} {today}", employee.id, employee.name);
        }
    }
    Ok(())
}

fn show_employee(roster: &Roster, id: &str, json: bool) -> Result<()> {
    let Some(employee) = roster.find_employee(id) else {
        bail!("employee {id} not found in the roster");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(employee)?);
        return Ok(());
    }
    println!(
        "{} ({}), {}",
        employee.name.bold(),
        employee.id,
        employee.team
    );
    for (label, cell) in roster.date_labels.iter().zip(&employee.schedule) {
        println!("  {label:<6} {}", display_label(cell));
    }
    Ok(())
}

fn print_roster_summary(roster: &Roster) {
    let labels = &roster.date_labels;
    let range = match (labels.first(), labels.last()) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => "no dates".to_string(),
    };
    println!(
        "{} teams, {} employees, {} dates ({range})",
        roster.teams.len(),
        roster.employee_count(),
        labels.len()
    );
}

// ────────────────────────────────────────────────────────────────────────────
// dashboard / diff
// ────────────────────────────────────────────────────────────────────────────

pub async fn cmd_dashboard(backend: &str, args: &DashboardArgs) -> Result<()> {
    let (employee_id, saved_name) = match &args.employee {
        Some(id) => (id.clone(), None),
        None => {
            let identity = session_cmd::require_identity()?;
            (identity.employee_id, Some(identity.full_name))
        }
    };

    let client = BackendClient::new(backend)?;
    let roster = client.display_data().await?.into_roster();
    let Some(employee) = roster.find_employee(&employee_id) else {
        bail!("employee {employee_id} not found in the roster");
    };

    let today = Local::now().date_naive();
    let name = saved_name.as_deref().unwrap_or(&employee.name);
    println!("{} ({}), {}", name.bold(), employee.id, employee.team);

    let shifts = overview::upcoming_shifts(&roster, employee, today, args.days);
    println!("\nUpcoming shifts, next {} days:", args.days);
    if shifts.is_empty() {
        println!("  none");
    }
    for day in &shifts {
        println!(
            "  {} {:<6} {}",
            day.date.format("%a"),
            day.date_label,
            display_label(&day.shift).green()
        );
    }

    let time_off =
        overview::upcoming_time_off(&roster, employee, today, overview::TIME_OFF_WINDOW_DAYS);
    println!(
        "\nTime off, next {} days (weekends excluded):",
        overview::TIME_OFF_WINDOW_DAYS
    );
    if time_off.is_empty() {
        println!("  none");
    }
    for day in &time_off {
        println!(
            "  {} {:<6} {}",
            day.date.format("%a"),
            day.date_label,
            display_label(&day.shift).yellow()
        );
    }

    let history = client.shift_history(&employee.id).await?;
    let changes = diff::diff_window(
        &history.headers,
        &history.google_schedule,
        &history.admin_schedule,
        today,
        args.days,
    );
    println!("\nShift changes, next {} days:", args.days);
    if changes.is_empty() {
        println!("  none");
    }
    for change in &changes {
        print_divergence(change);
    }
    Ok(())
}

pub async fn cmd_diff(backend: &str, args: &DiffArgs) -> Result<()> {
    let client = BackendClient::new(backend)?;
    let history = client.shift_history(&args.employee).await?;

    let divergences: Vec<ScheduleDivergence> = match &args.date {
        Some(label) => diff::diff_at(
            &history.headers,
            &history.google_schedule,
            &history.admin_schedule,
            label,
        )
        .into_iter()
        .collect(),
        None => diff::diff_window(
            &history.headers,
            &history.google_schedule,
            &history.admin_schedule,
            Local::now().date_naive(),
            args.days,
        ),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&divergences)?);
        return Ok(());
    }
    if divergences.is_empty() {
        println!("no divergences");
        return Ok(());
    }
    for divergence in &divergences {
        print_divergence(divergence);
    }
    Ok(())
}

fn print_divergence(divergence: &ScheduleDivergence) {
    println!(
        "  {:<6} {} -> {}",
        divergence.date_label,
        display_label(&divergence.original),
        display_label(&divergence.current).yellow()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_parses() {
        assert_eq!(parse_month_key("2025-09").unwrap(), (2025, 9));
        assert_eq!(parse_month_key("2026-12").unwrap(), (2026, 12));
    }

    #[test]
    fn month_key_rejects_garbage() {
        assert!(parse_month_key("2025").is_err());
        assert!(parse_month_key("2025-13").is_err());
        assert!(parse_month_key("2025-0").is_err());
        assert!(parse_month_key("Sep-2025").is_err());
    }
}
