//! `cht board` — the kanban view of one project's tasks.

use chantier_core::projection::{Board, BoardColumn, build_board};
use clap::Args;
use serde::Serialize;
use std::path::Path;

use crate::cmd::{no_project_error, resolve_project_id};
use crate::output::{CliError, OutputMode, render, render_error};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct BoardArgs {
    /// Project id (defaults to the active project).
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
struct BoardOutput {
    ok: bool,
    project_id: String,
    board: Board,
}

pub fn run_board(args: &BoardArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
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

    let result = BoardOutput {
        ok: true,
        project_id: project_id.clone(),
        board: build_board(project),
    };

    render(output, &result, |r, w| {
        for column in BoardColumn::ALL {
            let cards = r.board.column(column);
            writeln!(w, "{} ({})", column.title(), cards.len())?;
            for card in cards {
                writeln!(w, "  [{}] {} — {}", card.task.id, card.task.title, card.stage_title)?;
            }
            writeln!(w)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::BoardArgs;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: BoardArgs,
    }

    #[test]
    fn board_args_parse() {
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.id.is_none());

        let w = Wrapper::parse_from(["test", "PRJ-2026-abc123"]);
        assert_eq!(w.args.id.as_deref(), Some("PRJ-2026-abc123"));
    }
}
