//! Command handlers. One file per command family; each handler validates,
//! runs exactly one store operation, and renders through the output layer.

pub mod active;
pub mod board;
pub mod comment;
pub mod completions;
pub mod create;
pub mod delete;
pub mod doc;
pub mod done;
pub mod edit;
pub mod init;
pub mod journal;
pub mod list;
pub mod photo;
pub mod show;
pub mod stage;
pub mod task;

use chantier_core::{StoreError, StoreState};

use crate::output::CliError;

/// Resolve the project a command targets: explicit `-p` wins, otherwise
/// the active pointer (dangling pointers read as "no active project").
pub(crate) fn resolve_project_id(state: &StoreState, explicit: Option<&str>) -> Option<String> {
    if let Some(id) = explicit {
        return Some(id.to_string());
    }
    state.active_project().map(|p| p.id.clone())
}

pub(crate) fn no_project_error() -> CliError {
    CliError::with_hint(
        "no project selected",
        "Pass -p <project-id> or select one with `cht active <project-id>`",
        "no_active_project",
    )
}

pub(crate) fn store_error(err: &StoreError) -> CliError {
    CliError::with_hint(&err.to_string(), err.hint(), err.code())
}
