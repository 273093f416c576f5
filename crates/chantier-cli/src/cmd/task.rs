//! `cht task add` — append a task to a stage (the board's create form).

use chantier_core::model::{NewTask, UserRef};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::Path;

use crate::cmd::{no_project_error, resolve_project_id, store_error};
use crate::output::{OutputMode, render, render_error};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommand,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    #[command(
        about = "Add a task to a stage",
        after_help = "EXAMPLES:\n    # Add an open task to a stage of the active project\n    cht task add stg-ab12cd --title \"Reprise enduit\"\n\n    # Assign it right away\n    cht task add stg-ab12cd --title \"Joint silicone\" --assignee \"Karim Benali\""
    )]
    Add(TaskAddArgs),
}

#[derive(Args, Debug)]
pub struct TaskAddArgs {
    /// Stage id receiving the task.
    pub stage: String,

    /// Task title.
    #[arg(short, long)]
    pub title: String,

    /// Assignee display name.
    #[arg(long)]
    pub assignee: Option<String>,

    /// Project id (defaults to the active project).
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Debug, Serialize)]
struct TaskAddOutput {
    ok: bool,
    project_id: String,
    stage_id: String,
    task_id: String,
    stage_progress: u8,
}

pub fn run_task(args: &TaskArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    match &args.command {
        TaskCommand::Add(add) => run_task_add(add, output, project_root),
    }
}

fn run_task_add(args: &TaskAddArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let outcome = snapshot::with_store(project_root, |store| {
        let Some(project_id) = resolve_project_id(store.state(), args.project.as_deref()) else {
            return Ok(Err(no_project_error()));
        };

        let input = NewTask {
            title: args.title.clone(),
            completed: false,
            assignee: args.assignee.as_deref().map(UserRef::from_name),
        };
        match store.add_task(&project_id, &args.stage, input) {
            Err(err) => Ok(Err(store_error(&err))),
            Ok(task_id) => {
                let stage_progress = store
                    .state()
                    .project(&project_id)
                    .and_then(|p| p.stage(&args.stage))
                    .map_or(0, |s| s.progress);
                Ok(Ok(TaskAddOutput {
                    ok: true,
                    project_id,
                    stage_id: args.stage.clone(),
                    task_id,
                    stage_progress,
                }))
            }
        }
    })?;

    match outcome {
        Ok(result) => render(output, &result, |r, w| {
            writeln!(w, "✓ {}: task added (stage now {}%)", r.task_id, r.stage_progress)
        }),
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!("{}", cli_err.error);
        }
    }
}
