//! `cht active` — show or move the active-project pointer.
//!
//! Setting the pointer never validates the id: readers treat a dangling
//! pointer as "no active project".

use clap::Args;
use serde::Serialize;
use std::path::Path;

use crate::output::{OutputMode, render};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct ActiveArgs {
    /// Project id to select. Omit to show the current selection.
    pub id: Option<String>,

    /// Clear the selection instead.
    #[arg(long, conflicts_with = "id")]
    pub clear: bool,
}

#[derive(Debug, Serialize)]
struct ActiveOutput {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_project_id: Option<String>,
    /// False when the pointer is set but no such project exists.
    resolved: bool,
}

pub fn run_active(args: &ActiveArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let state = if args.clear || args.id.is_some() {
        snapshot::with_store(project_root, |store| {
            store.set_active_project(args.id.as_deref());
            Ok(store.state().clone())
        })?
    } else {
        snapshot::read_store(project_root)?.into_state()
    };

    let result = ActiveOutput {
        ok: true,
        active_project_id: state.active_project_id.clone(),
        resolved: state.active_project().is_some(),
    };
    render(output, &result, |r, w| match (&r.active_project_id, r.resolved) {
        (Some(id), true) => writeln!(w, "active project: {id}"),
        (Some(id), false) => writeln!(w, "active project: {id} (not found — treated as none)"),
        (None, _) => writeln!(w, "no active project"),
    })
}
