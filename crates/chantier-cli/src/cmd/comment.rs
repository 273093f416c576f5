//! `cht comment add` — append a comment to a stage.
//!
//! Comments never touch progress or status; they are pure annotations on
//! the stage's thread.

use chantier_core::model::UserRef;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::Path;

use crate::cmd::{no_project_error, resolve_project_id, store_error};
use crate::output::{CliError, OutputMode, render, render_error};
use crate::snapshot;

const MAX_COMMENT_CHARS: usize = 4_096;

#[derive(Args, Debug)]
pub struct CommentArgs {
    #[command(subcommand)]
    pub command: CommentCommand,
}

#[derive(Subcommand, Debug)]
pub enum CommentCommand {
    #[command(
        about = "Add a comment to a stage",
        after_help = "EXAMPLES:\n    # Comment on a stage of the active project\n    cht comment add stg-ab12cd \"Livraison prévue lundi\"\n\n    # With explicit author\n    cht --user \"Marie Laurent\" comment add stg-ab12cd \"RAS\""
    )]
    Add(CommentAddArgs),
}

#[derive(Args, Debug)]
pub struct CommentAddArgs {
    /// Stage id to comment on.
    pub stage: String,

    /// Comment body.
    pub text: String,

    /// Project id (defaults to the active project).
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Debug, Serialize)]
struct CommentAddOutput {
    ok: bool,
    project_id: String,
    stage_id: String,
    comment_id: String,
    author: String,
}

fn validate_text(text: &str) -> Result<(), CliError> {
    if text.trim().is_empty() {
        return Err(CliError::new("comment text must not be empty", "invalid_comment"));
    }
    if text.chars().count() > MAX_COMMENT_CHARS {
        return Err(CliError::with_hint(
            &format!("comment text must be <= {MAX_COMMENT_CHARS} characters"),
            "Split long notes into a project update",
            "invalid_comment",
        ));
    }
    Ok(())
}

pub fn run_comment(
    args: &CommentArgs,
    user: &UserRef,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    match &args.command {
        CommentCommand::Add(add) => run_comment_add(add, user, output, project_root),
    }
}

fn run_comment_add(
    args: &CommentAddArgs,
    user: &UserRef,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    if let Err(cli_err) = validate_text(&args.text) {
        render_error(output, &cli_err)?;
        anyhow::bail!("{}", cli_err.error);
    }

    let outcome = snapshot::with_store(project_root, |store| {
        let Some(project_id) = resolve_project_id(store.state(), args.project.as_deref()) else {
            return Ok(Err(no_project_error()));
        };

        match store.add_comment(&project_id, &args.stage, &args.text, user.clone()) {
            Err(err) => Ok(Err(store_error(&err))),
            Ok(comment_id) => Ok(Ok(CommentAddOutput {
                ok: true,
                project_id,
                stage_id: args.stage.clone(),
                comment_id,
                author: user.name.clone(),
            })),
        }
    })?;

    match outcome {
        Ok(result) => render(output, &result, |r, w| {
            writeln!(w, "✓ {}: comment added by {}", r.stage_id, r.author)
        }),
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!("{}", cli_err.error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CommentCommand, validate_text};
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(subcommand)]
        cmd: CommentCommand,
    }

    #[test]
    fn comment_add_args_parse() {
        let w = Wrapper::parse_from(["test", "add", "stg-1", "Livraison prévue lundi"]);
        match w.cmd {
            CommentCommand::Add(args) => {
                assert_eq!(args.stage, "stg-1");
                assert_eq!(args.text, "Livraison prévue lundi");
            }
        }
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(validate_text("   ").is_err());
        assert!(validate_text("ok").is_ok());
    }

    #[test]
    fn oversized_text_is_rejected() {
        let long = "x".repeat(5_000);
        let err = validate_text(&long).expect_err("too long");
        assert_eq!(err.code, "invalid_comment");
    }
}
