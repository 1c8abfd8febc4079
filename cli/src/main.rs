//! Entry point for the `roster` command-line tool.

mod admin_cmd;
mod mods_cmd;
mod requests_cmd;
mod roster_cmd;
mod session_cmd;
mod sync_cmd;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use roster_backend_client::BackendClient;

#[derive(Debug, Parser)]
#[command(name = "roster", version, about = "Shift roster dashboard tools")]
struct Cli {
    /// Base URL of the roster backend.
    #[arg(
        long,
        global = true,
        env = "ROSTER_BACKEND_URL",
        default_value = BackendClient::DEFAULT_BASE_URL
    )]
    backend: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse local roster exports and print the merged roster.
    Parse(roster_cmd::ParseArgs),
    /// Generate an upload template CSV for one month.
    Template(roster_cmd::TemplateArgs),
    /// Show the roster currently served by the backend.
    Show(roster_cmd::ShowArgs),
    /// Upcoming shifts, time off and shift changes for one employee.
    Dashboard(roster_cmd::DashboardArgs),
    /// Divergences between the synced schedule and admin edits.
    Diff(roster_cmd::DiffArgs),
    /// Refresh the shared roster once, or keep it refreshed on a timer.
    Sync(sync_cmd::SyncArgs),
    /// Submit, list and decide shift change and swap requests.
    Requests(requests_cmd::RequestsCli),
    /// Administrative operations against the backend.
    Admin(admin_cmd::AdminCli),
    /// Shift modification log and monthly stats.
    Mods(mods_cmd::ModsArgs),
    /// Save your name and employee id for the other commands.
    Login(session_cmd::LoginArgs),
    /// Forget the saved identity.
    Logout,
    /// Show the saved identity.
    Whoami(session_cmd::WhoamiArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Parse(args) => roster_cmd::cmd_parse(args),
        Command::Template(args) => roster_cmd::cmd_template(args),
        Command::Show(args) => roster_cmd::cmd_show(&cli.backend, args).await,
        Command::Dashboard(args) => roster_cmd::cmd_dashboard(&cli.backend, args).await,
        Command::Diff(args) => roster_cmd::cmd_diff(&cli.backend, args).await,
        Command::Sync(args) => sync_cmd::cmd_sync(&cli.backend, args).await,
        Command::Requests(cmd) => cmd.run(&cli.backend).await,
        Command::Admin(cmd) => cmd.run(&cli.backend).await,
        Command::Mods(args) => mods_cmd::cmd_mods(&cli.backend, args).await,
        Command::Login(args) => session_cmd::cmd_login(args),
        Command::Logout => session_cmd::cmd_logout(),
        Command::Whoami(args) => session_cmd::cmd_whoami(args),
    }
}
