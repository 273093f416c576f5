//! `cht create` — add a new project.

use chantier_core::model::{NewProject, NewStage};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::path::Path;

use crate::output::{OutputMode, render};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Title of the new project.
    #[arg(short, long)]
    pub title: String,

    /// Description text.
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Site location.
    #[arg(short, long, default_value = "")]
    pub location: String,

    /// Start date (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,

    /// Planned end date (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Budget in whole currency units.
    #[arg(short, long, default_value_t = 0)]
    pub budget: i64,

    /// JSON file holding the stage list (array of NewStage objects).
    /// Stages arrive with the project; they are not added later.
    #[arg(long)]
    pub stages_file: Option<std::path::PathBuf>,
}

#[derive(Debug, Serialize)]
struct CreateOutput {
    ok: bool,
    id: String,
    title: String,
    stages: usize,
}

pub fn run_create(args: &CreateArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let stages: Vec<NewStage> = match &args.stages_file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
            serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?
        }
        None => Vec::new(),
    };
    let stage_count = stages.len();

    let (id, title) = snapshot::with_store(project_root, |store| {
        let id = store.add_project(NewProject {
            title: args.title.clone(),
            description: args.description.clone(),
            location: args.location.clone(),
            start_date: args.start,
            end_date: args.end,
            budget: args.budget,
            contractor: None,
            stages,
        });
        Ok((id, args.title.clone()))
    })?;

    let result = CreateOutput {
        ok: true,
        id,
        title,
        stages: stage_count,
    };
    render(output, &result, |r, w| {
        writeln!(w, "✓ {}: project created ({} stages)", r.id, r.stages)
    })
}
