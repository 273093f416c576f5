//! `cht doc add` — attach a document to a project.

use chantier_core::model::NewDocument;
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::Path;

use crate::cmd::{no_project_error, resolve_project_id, store_error};
use crate::output::{OutputMode, render, render_error};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct DocArgs {
    #[command(subcommand)]
    pub command: DocCommand,
}

#[derive(Subcommand, Debug)]
pub enum DocCommand {
    #[command(
        about = "Attach a document to a project",
        after_help = "EXAMPLES:\n    cht doc add \"Devis signé\" --kind pdf --url https://cdn.example/devis.pdf"
    )]
    Add(DocAddArgs),
}

#[derive(Args, Debug)]
pub struct DocAddArgs {
    /// Document name.
    pub name: String,

    /// Document kind, e.g. pdf.
    #[arg(long, default_value = "pdf")]
    pub kind: String,

    /// Document date (YYYY-MM-DD, defaults to today).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Url (already uploaded).
    #[arg(long)]
    pub url: Option<String>,

    /// Project id (defaults to the active project).
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Debug, Serialize)]
struct DocAddOutput {
    ok: bool,
    project_id: String,
    document_id: String,
    name: String,
}

pub fn run_doc(args: &DocArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    match &args.command {
        DocCommand::Add(add) => run_doc_add(add, output, project_root),
    }
}

fn run_doc_add(args: &DocAddArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let outcome = snapshot::with_store(project_root, |store| {
        let Some(project_id) = resolve_project_id(store.state(), args.project.as_deref()) else {
            return Ok(Err(no_project_error()));
        };

        let input = NewDocument {
            name: args.name.clone(),
            kind: args.kind.clone(),
            date: args.date.unwrap_or_else(|| Utc::now().date_naive()),
            url: args.url.clone(),
        };
        match store.add_project_document(&project_id, input) {
            Err(err) => Ok(Err(store_error(&err))),
            Ok(document_id) => Ok(Ok(DocAddOutput {
                ok: true,
                project_id,
                document_id,
                name: args.name.clone(),
            })),
        }
    })?;

    match outcome {
        Ok(result) => render(output, &result, |r, w| {
            writeln!(w, "✓ {}: document '{}' attached", r.project_id, r.name)
        }),
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!("{}", cli_err.error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DocCommand;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(subcommand)]
        cmd: DocCommand,
    }

    #[test]
    fn doc_add_args_parse() {
        let w = Wrapper::parse_from(["test", "add", "Devis signé", "--kind", "pdf"]);
        match w.cmd {
            DocCommand::Add(args) => {
                assert_eq!(args.name, "Devis signé");
                assert_eq!(args.kind, "pdf");
                assert!(args.date.is_none());
                assert!(args.url.is_none());
            }
        }
    }

    #[test]
    fn doc_add_parses_date() {
        let w = Wrapper::parse_from(["test", "add", "Permis", "--date", "2026-02-14"]);
        match w.cmd {
            DocCommand::Add(args) => {
                assert_eq!(
                    args.date,
                    chrono::NaiveDate::from_ymd_opt(2026, 2, 14)
                );
            }
        }
    }
}
