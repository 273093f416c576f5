//! `cht delete` — remove a project from the collection.
//!
//! No cascading side effects beyond clearing the active pointer when it
//! pointed at the deleted project.

use clap::Args;
use serde::Serialize;
use std::path::Path;

use crate::cmd::store_error;
use crate::output::{OutputMode, render, render_error};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Project id to delete.
    pub id: String,

    /// Skip the are-you-sure check.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    ok: bool,
    id: String,
    remaining: usize,
}

pub fn run_delete(args: &DeleteArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    if !args.force {
        let err = crate::output::CliError::with_hint(
            "refusing to delete without --force",
            "Re-run with --force to confirm",
            "confirmation_required",
        );
        render_error(output, &err)?;
        anyhow::bail!("{}", err.error);
    }

    let outcome = snapshot::with_store(project_root, |store| {
        match store.delete_project(&args.id) {
            Err(err) => Ok(Err(store_error(&err))),
            Ok(()) => Ok(Ok(DeleteOutput {
                ok: true,
                id: args.id.clone(),
                remaining: store.state().projects.len(),
            })),
        }
    })?;

    match outcome {
        Ok(result) => render(output, &result, |r, w| {
            writeln!(w, "✓ {}: deleted ({} projects left)", r.id, r.remaining)
        }),
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!("{}", cli_err.error);
        }
    }
}
