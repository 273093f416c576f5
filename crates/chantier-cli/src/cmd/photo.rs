//! `cht photo add` — attach a progress photo to a stage.
//!
//! Only a url is accepted: resolving a file to a url is the asset-upload
//! collaborator's job, never this binary's.

use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::Path;

use crate::cmd::{no_project_error, resolve_project_id, store_error};
use crate::output::{OutputMode, render, render_error};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct PhotoArgs {
    #[command(subcommand)]
    pub command: PhotoCommand,
}

#[derive(Subcommand, Debug)]
pub enum PhotoCommand {
    #[command(
        about = "Add a photo to a stage",
        after_help = "EXAMPLES:\n    cht photo add stg-ab12cd https://cdn.example/mur.jpg --caption \"Murs posés\""
    )]
    Add(PhotoAddArgs),
}

#[derive(Args, Debug)]
pub struct PhotoAddArgs {
    /// Stage id receiving the photo.
    pub stage: String,

    /// Photo url (already uploaded).
    pub url: String,

    /// Optional caption.
    #[arg(long)]
    pub caption: Option<String>,

    /// Project id (defaults to the active project).
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Debug, Serialize)]
struct PhotoAddOutput {
    ok: bool,
    project_id: String,
    stage_id: String,
    photo_id: String,
}

pub fn run_photo(args: &PhotoArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    match &args.command {
        PhotoCommand::Add(add) => run_photo_add(add, output, project_root),
    }
}

fn run_photo_add(args: &PhotoAddArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let outcome = snapshot::with_store(project_root, |store| {
        let Some(project_id) = resolve_project_id(store.state(), args.project.as_deref()) else {
            return Ok(Err(no_project_error()));
        };

        match store.add_photo(&project_id, &args.stage, &args.url, args.caption.as_deref()) {
            Err(err) => Ok(Err(store_error(&err))),
            Ok(photo_id) => Ok(Ok(PhotoAddOutput {
                ok: true,
                project_id,
                stage_id: args.stage.clone(),
                photo_id,
            })),
        }
    })?;

    match outcome {
        Ok(result) => render(output, &result, |r, w| {
            writeln!(w, "✓ {}: photo added", r.stage_id)
        }),
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!("{}", cli_err.error);
        }
    }
}
