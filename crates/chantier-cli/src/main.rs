#![forbid(unsafe_code)]

mod cmd;
mod identity;
mod loader;
mod output;
mod seed;
mod snapshot;
mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use std::env;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "chantier: construction project progress tracker",
    long_about = None
)]
struct Cli {
    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Override the current user identity (skips env resolution).
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }

    fn user_flag(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lifecycle",
        about = "Initialize a chantier workspace",
        long_about = "Create the .chantier directory and snapshot in the current directory.",
        after_help = "EXAMPLES:\n    # Start empty\n    cht init\n\n    # Start with the demo dataset\n    cht init --seed"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Create a new project",
        after_help = "EXAMPLES:\n    # Create a project\n    cht create --title \"Rénovation cuisine\" --location Lyon --start 2026-03-02 --budget 24000\n\n    # With a stage list\n    cht create --title \"Extension\" --start 2026-06-01 --stages-file stages.json"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Read",
        about = "List projects",
        after_help = "EXAMPLES:\n    # All projects\n    cht list\n\n    # Only running ones\n    cht list --status in_progress"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show a project's stage timeline",
        after_help = "EXAMPLES:\n    # Timeline of the active project\n    cht show\n\n    # Full detail for one project\n    cht show PRJ-2026-x7k3q9 --full"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show a project's task board",
        after_help = "EXAMPLES:\n    # Board of the active project\n    cht board\n\n    # Machine-readable buckets\n    cht board --json"
    )]
    Board(cmd::board::BoardArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show or set the active project",
        after_help = "EXAMPLES:\n    # Show the selection\n    cht active\n\n    # Select a project\n    cht active PRJ-2026-x7k3q9\n\n    # Clear it\n    cht active --clear"
    )]
    Active(cmd::active::ActiveArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Complete a task",
        after_help = "EXAMPLES:\n    # Complete a task in the active project\n    cht done stg-ab12cd tsk-ef34gh"
    )]
    Done(cmd::done::DoneArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Reopen a completed task",
        after_help = "EXAMPLES:\n    cht reopen stg-ab12cd tsk-ef34gh"
    )]
    Reopen(cmd::done::ReopenArgs),

    #[command(next_help_heading = "Lifecycle", about = "Manage stage tasks")]
    Task(cmd::task::TaskArgs),

    #[command(next_help_heading = "Lifecycle", about = "Manage stage scheduling status")]
    Stage(cmd::stage::StageArgs),

    #[command(next_help_heading = "Annotations", about = "Comment on a stage")]
    Comment(cmd::comment::CommentArgs),

    #[command(next_help_heading = "Annotations", about = "Attach photos to a stage")]
    Photo(cmd::photo::PhotoArgs),

    #[command(next_help_heading = "Annotations", about = "Post site updates")]
    Journal(cmd::journal::JournalArgs),

    #[command(next_help_heading = "Annotations", about = "Attach project documents")]
    Doc(cmd::doc::DocArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Edit project fields",
        after_help = "EXAMPLES:\n    # Raise the budget\n    cht edit PRJ-2026-x7k3q9 --budget 31000\n\n    # Cancel a project\n    cht edit PRJ-2026-x7k3q9 --status cancelled"
    )]
    Edit(cmd::edit::EditArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Delete a project",
        after_help = "EXAMPLES:\n    cht delete PRJ-2026-x7k3q9 --force"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Interactive",
        about = "Open the interactive timeline/board",
        after_help = "EXAMPLES:\n    # Open the TUI on the active project\n    cht tui"
    )]
    Tui(tui::TuiArgs),

    #[command(
        next_help_heading = "Workspace Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    cht completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CHANTIER_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "chantier=debug,info"
        } else {
            "chantier=info,warn"
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Resolve identity for a mutating command, rendering the error the way
/// every other failure is rendered.
fn require_user(cli: &Cli, output: OutputMode) -> anyhow::Result<chantier_core::model::UserRef> {
    match identity::require_user(cli.user_flag()) {
        Ok(user) => Ok(user),
        Err(e) => {
            render_error(
                output,
                &CliError::with_hint(
                    &e.message,
                    "Set --user, CHANTIER_USER, or add [user] to the chantier config",
                    e.code,
                ),
            )?;
            anyhow::bail!("{}", e.message);
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();

    match &cli.command {
        Commands::Init(args) => cmd::init::run_init(args, output, &project_root),
        Commands::Create(args) => cmd::create::run_create(args, output, &project_root),
        Commands::List(args) => cmd::list::run_list(args, output, &project_root),
        Commands::Show(args) => cmd::show::run_show(args, output, &project_root),
        Commands::Board(args) => cmd::board::run_board(args, output, &project_root),
        Commands::Active(args) => cmd::active::run_active(args, output, &project_root),
        Commands::Done(args) => cmd::done::run_done(args, output, &project_root),
        Commands::Reopen(args) => cmd::done::run_reopen(args, output, &project_root),
        Commands::Task(args) => cmd::task::run_task(args, output, &project_root),
        Commands::Stage(args) => cmd::stage::run_stage(args, output, &project_root),
        Commands::Comment(args) => {
            let user = require_user(&cli, output)?;
            cmd::comment::run_comment(args, &user, output, &project_root)
        }
        Commands::Photo(args) => cmd::photo::run_photo(args, output, &project_root),
        Commands::Journal(args) => {
            let user = require_user(&cli, output)?;
            cmd::journal::run_journal(args, &user, output, &project_root)
        }
        Commands::Doc(args) => cmd::doc::run_doc(args, output, &project_root),
        Commands::Edit(args) => cmd::edit::run_edit(args, output, &project_root),
        Commands::Delete(args) => cmd::delete::run_delete(args, output, &project_root),
        Commands::Tui(args) => tui::run_tui(args, cli.user_flag(), &project_root),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
