//! `cht stage status` — the explicit external input for stage status.
//!
//! This is the only way a stage becomes `delayed`; the progress engine
//! never sets it on its own, and at 100% the recompute immediately forces
//! the stage back to `completed` whatever was requested.

use chantier_core::model::status::StageStatus;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::Path;

use crate::cmd::{no_project_error, resolve_project_id, store_error};
use crate::output::{OutputMode, render, render_error};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct StageArgs {
    #[command(subcommand)]
    pub command: StageCommand,
}

#[derive(Subcommand, Debug)]
pub enum StageCommand {
    #[command(
        about = "Set a stage's status (scheduling input)",
        after_help = "EXAMPLES:\n    # Flag a delivery slip\n    cht stage status stg-ab12cd delayed\n\n    # Back to normal\n    cht stage status stg-ab12cd in_progress"
    )]
    Status(StageStatusArgs),
}

#[derive(Args, Debug)]
pub struct StageStatusArgs {
    /// Stage id.
    pub stage: String,

    /// New status: pending, in_progress, completed, or delayed.
    pub status: StageStatus,

    /// Project id (defaults to the active project).
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Debug, Serialize)]
struct StageStatusOutput {
    ok: bool,
    project_id: String,
    stage_id: String,
    status: StageStatus,
    project_progress: u8,
}

pub fn run_stage(args: &StageArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    match &args.command {
        StageCommand::Status(status) => run_stage_status(status, output, project_root),
    }
}

fn run_stage_status(
    args: &StageStatusArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let outcome = snapshot::with_store(project_root, |store| {
        let Some(project_id) = resolve_project_id(store.state(), args.project.as_deref()) else {
            return Ok(Err(no_project_error()));
        };

        if let Err(err) = store.set_stage_status(&project_id, &args.stage, args.status) {
            return Ok(Err(store_error(&err)));
        }

        let project = store
            .state()
            .project(&project_id)
            .ok_or_else(|| anyhow::anyhow!("project vanished mid-operation"))?;
        let status = project.stage(&args.stage).map_or(args.status, |s| s.status);
        Ok(Ok(StageStatusOutput {
            ok: true,
            project_id,
            stage_id: args.stage.clone(),
            status,
            project_progress: project.progress,
        }))
    })?;

    match outcome {
        Ok(result) => render(output, &result, |r, w| {
            writeln!(w, "✓ {}: status set to {} (project {}%)", r.stage_id, r.status, r.project_progress)
        }),
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!("{}", cli_err.error);
        }
    }
}
