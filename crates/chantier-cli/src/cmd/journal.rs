//! `cht journal add` — post a site update to a project's feed.
//!
//! The feed is newest-first: new entries are prepended.

use chantier_core::model::{NewUpdate, UserRef};
use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::Path;

use crate::cmd::{no_project_error, resolve_project_id, store_error};
use crate::output::{OutputMode, render, render_error};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct JournalArgs {
    #[command(subcommand)]
    pub command: JournalCommand,
}

#[derive(Subcommand, Debug)]
pub enum JournalCommand {
    #[command(
        about = "Post a site update",
        after_help = "EXAMPLES:\n    cht journal add \"Fin de la démolition\" --photo https://cdn.example/demo1.jpg"
    )]
    Add(JournalAddArgs),
}

#[derive(Args, Debug)]
pub struct JournalAddArgs {
    /// Update content.
    pub content: String,

    /// Photo urls to attach (repeatable).
    #[arg(long = "photo")]
    pub photos: Vec<String>,

    /// Project id (defaults to the active project).
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Debug, Serialize)]
struct JournalAddOutput {
    ok: bool,
    project_id: String,
    update_id: String,
    author: String,
}

pub fn run_journal(
    args: &JournalArgs,
    user: &UserRef,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    match &args.command {
        JournalCommand::Add(add) => run_journal_add(add, user, output, project_root),
    }
}

fn run_journal_add(
    args: &JournalAddArgs,
    user: &UserRef,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let outcome = snapshot::with_store(project_root, |store| {
        let Some(project_id) = resolve_project_id(store.state(), args.project.as_deref()) else {
            return Ok(Err(no_project_error()));
        };

        let input = NewUpdate {
            date: Utc::now(),
            content: args.content.clone(),
            photos: args.photos.clone(),
            author: user.name.clone(),
        };
        match store.add_project_update(&project_id, input) {
            Err(err) => Ok(Err(store_error(&err))),
            Ok(update_id) => Ok(Ok(JournalAddOutput {
                ok: true,
                project_id,
                update_id,
                author: user.name.clone(),
            })),
        }
    })?;

    match outcome {
        Ok(result) => render(output, &result, |r, w| {
            writeln!(w, "✓ {}: update posted by {}", r.project_id, r.author)
        }),
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!("{}", cli_err.error);
        }
    }
}
