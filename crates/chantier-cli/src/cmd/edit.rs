//! `cht edit` — shallow-merge fields into a project.
//!
//! Progress is absent on purpose: it is derived, never set. Status is
//! accepted (cancellations are external input) but the recompute still
//! forces `completed` whenever the project sits at 100%.

use chantier_core::model::ProjectPatch;
use chantier_core::model::status::ProjectStatus;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::path::Path;

use crate::cmd::store_error;
use crate::output::{CliError, OutputMode, render, render_error};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Project id to edit.
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// New start date (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// New end date (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<NaiveDate>,

    #[arg(long)]
    pub budget: Option<i64>,

    /// New status: pending, in_progress, completed, or cancelled.
    #[arg(long)]
    pub status: Option<ProjectStatus>,
}

impl EditArgs {
    fn to_patch(&self) -> ProjectPatch {
        ProjectPatch {
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start_date: self.start,
            end_date: self.end,
            budget: self.budget,
            status: self.status,
            contractor: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct EditOutput {
    ok: bool,
    id: String,
    status: ProjectStatus,
    progress: u8,
}

pub fn run_edit(args: &EditArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let patch = args.to_patch();
    if patch.is_empty() {
        let err = CliError::with_hint(
            "nothing to change",
            "Pass at least one field flag, e.g. --budget 30000",
            "empty_patch",
        );
        render_error(output, &err)?;
        anyhow::bail!("{}", err.error);
    }

    let outcome = snapshot::with_store(project_root, |store| {
        match store.update_project(&args.id, patch) {
            Err(err) => Ok(Err(store_error(&err))),
            Ok(()) => {
                let project = store
                    .state()
                    .project(&args.id)
                    .ok_or_else(|| anyhow::anyhow!("project vanished mid-operation"))?;
                Ok(Ok(EditOutput {
                    ok: true,
                    id: args.id.clone(),
                    status: project.status,
                    progress: project.progress,
                }))
            }
        }
    })?;

    match outcome {
        Ok(result) => render(output, &result, |r, w| {
            writeln!(w, "✓ {}: updated ({}, {}%)", r.id, r.status, r.progress)
        }),
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!("{}", cli_err.error);
        }
    }
}
