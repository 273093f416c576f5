//! `cht show` — the timeline view of one project.
//!
//! Stages render in construction order with a header line each; `--full`
//! expands tasks, photos, and comments the way the interactive timeline
//! does. The global percent is re-derived at render time from stage
//! statuses rather than read from the stored field.

use chantier_core::model::Project;
use chantier_core::model::status::StageStatus;
use chantier_core::projection::{TimelineEntry, build_timeline, derived_progress};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::cmd::{no_project_error, resolve_project_id};
use crate::output::{CliError, OutputMode, progress_bar, render, render_error};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Project id (defaults to the active project).
    pub id: Option<String>,

    /// Expand tasks, photos, and comments for every stage.
    #[arg(long)]
    pub full: bool,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    ok: bool,
    project: Project,
    timeline: Vec<TimelineEntry>,
    derived_progress: u8,
}

const fn status_icon(status: StageStatus) -> &'static str {
    match status {
        StageStatus::Completed => "●",
        StageStatus::InProgress => "◐",
        StageStatus::Delayed => "!",
        StageStatus::Pending => "○",
    }
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = snapshot::read_store(project_root)?;

    let Some(project_id) = resolve_project_id(store.state(), args.id.as_deref()) else {
        render_error(output, &no_project_error())?;
        anyhow::bail!("no project selected");
    };
    let Some(project) = store.state().project(&project_id) else {
        let msg = format!("project '{project_id}' not found");
        render_error(
            output,
            &CliError::with_hint(&msg, "Check the project id with `cht list`", "project_not_found"),
        )?;
        anyhow::bail!("{msg}");
    };

    let result = ShowOutput {
        ok: true,
        project: project.clone(),
        timeline: build_timeline(project),
        derived_progress: derived_progress(project),
    };

    let full = args.full;
    render(output, &result, move |r, w| {
        render_human(r, full, w)
    })
}

fn render_human(r: &ShowOutput, full: bool, w: &mut dyn Write) -> std::io::Result<()> {
    let p = &r.project;
    writeln!(w, "{} — {}", p.id, p.title)?;
    writeln!(w, "{}  ·  budget {}", p.location, p.budget)?;
    if let Some(contractor) = &p.contractor {
        writeln!(w, "contractor: {} ({:.1}★)", contractor.name, contractor.rating)?;
    }
    writeln!(w, "{}  {}", progress_bar(r.derived_progress, 20), p.status)?;
    writeln!(w)?;

    for entry in &r.timeline {
        let range = entry.end_date.map_or_else(
            || entry.start_date.to_string(),
            |end| format!("{} → {end}", entry.start_date),
        );
        writeln!(
            w,
            "{} {:<28} {:<12} {:>3}%  {range}",
            status_icon(entry.status),
            entry.title,
            entry.status.to_string(),
            entry.progress,
        )?;

        if full {
            let stage = p.stage(&entry.stage_id);
            if let Some(stage) = stage {
                for task in &stage.tasks {
                    let mark = if task.completed { "x" } else { " " };
                    match &task.assignee {
                        Some(who) => writeln!(w, "    [{mark}] {} ({})", task.title, who.name)?,
                        None => writeln!(w, "    [{mark}] {}", task.title)?,
                    }
                }
                for photo in &stage.photos {
                    match &photo.caption {
                        Some(caption) => writeln!(w, "    📷 {} — {caption}", photo.url)?,
                        None => writeln!(w, "    📷 {}", photo.url)?,
                    }
                }
                for comment in &stage.comments {
                    writeln!(
                        w,
                        "    💬 [{}] {}: {}",
                        comment.timestamp.format("%Y-%m-%d %H:%M"),
                        comment.author.name,
                        comment.text
                    )?;
                }
            }
        }
    }

    if full && !p.updates.is_empty() {
        writeln!(w)?;
        writeln!(w, "Updates:")?;
        for update in &p.updates {
            writeln!(
                w,
                "- [{}] {}: {}",
                update.date.format("%Y-%m-%d"),
                update.author,
                update.content
            )?;
        }
    }
    if full && !p.documents.is_empty() {
        writeln!(w)?;
        writeln!(w, "Documents:")?;
        for doc in &p.documents {
            writeln!(w, "- {} ({}, {})", doc.name, doc.kind, doc.date)?;
        }
    }
    Ok(())
}
