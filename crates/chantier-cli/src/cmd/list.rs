//! `cht list` — list projects with derived progress.

use chantier_core::model::status::ProjectStatus;
use clap::Args;
use serde::Serialize;
use std::path::Path;

use crate::output::{OutputMode, progress_bar, render};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show projects with this status.
    #[arg(long)]
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Serialize)]
struct ListRow {
    id: String,
    title: String,
    location: String,
    status: ProjectStatus,
    progress: u8,
    active: bool,
}

pub fn run_list(args: &ListArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = snapshot::read_store(project_root)?;
    let active_id = store.state().active_project().map(|p| p.id.clone());

    let rows: Vec<ListRow> = store
        .state()
        .projects
        .iter()
        .filter(|p| args.status.is_none_or(|s| p.status == s))
        .map(|p| ListRow {
            id: p.id.clone(),
            title: p.title.clone(),
            location: p.location.clone(),
            status: p.status,
            progress: p.progress,
            active: active_id.as_deref() == Some(&p.id),
        })
        .collect();

    render(output, &rows, |rows, w| {
        if rows.is_empty() {
            writeln!(w, "(no projects)")?;
            return Ok(());
        }
        for row in rows {
            let marker = if row.active { "*" } else { " " };
            writeln!(
                w,
                "{marker} {:<18} {} {:<12} {}",
                row.id,
                progress_bar(row.progress, 10),
                row.status.to_string(),
                row.title,
            )?;
        }
        Ok(())
    })
}
