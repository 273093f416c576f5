//! `cht init` — create the `.chantier` workspace directory.

use clap::Args;
use serde::Serialize;
use std::path::Path;

use crate::output::{CliError, OutputMode, render, render_error};
use crate::snapshot::{self, DIR_NAME, SNAPSHOT_FILE};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Install the demo dataset instead of an empty store.
    #[arg(long)]
    pub seed: bool,
}

#[derive(Debug, Serialize)]
struct InitOutput {
    ok: bool,
    path: String,
    projects: usize,
}

pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let dir = project_root.join(DIR_NAME);
    if dir.exists() {
        let msg = format!("already initialized: {} exists", dir.display());
        render_error(
            output,
            &CliError::with_hint(&msg, "Remove the directory to start over", "already_initialized"),
        )?;
        anyhow::bail!("{msg}");
    }

    std::fs::create_dir_all(&dir)?;
    let state = if args.seed {
        crate::seed::demo_state()
    } else {
        chantier_core::StoreState::default()
    };
    let path = dir.join(SNAPSHOT_FILE);
    snapshot::save_state(&path, &state)?;
    tracing::info!(path = %path.display(), seeded = args.seed, "workspace initialized");

    let result = InitOutput {
        ok: true,
        path: path.display().to_string(),
        projects: state.projects.len(),
    };
    render(output, &result, |r, w| {
        writeln!(w, "✓ initialized chantier workspace ({} projects)", r.projects)
    })
}
