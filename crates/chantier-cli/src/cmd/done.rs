//! `cht done` and `cht reopen` — toggle a task's completion.
//!
//! Both run the symmetric store operation followed by the stage and
//! project recompute; `done` on an already-completed task is a data no-op.

use clap::Args;
use serde::Serialize;
use std::path::Path;

use crate::cmd::{no_project_error, resolve_project_id, store_error};
use crate::output::{OutputMode, render, render_error};
use crate::snapshot;

#[derive(Args, Debug)]
pub struct DoneArgs {
    /// Stage id owning the task.
    pub stage: String,

    /// Task id to complete.
    pub task: String,

    /// Project id (defaults to the active project).
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReopenArgs {
    /// Stage id owning the task.
    pub stage: String,

    /// Task id to reopen.
    pub task: String,

    /// Project id (defaults to the active project).
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Debug, Serialize)]
struct ToggleOutput {
    ok: bool,
    project_id: String,
    stage_id: String,
    task_id: String,
    completed: bool,
    stage_progress: u8,
    project_progress: u8,
}

pub fn run_done(args: &DoneArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    toggle(
        args.project.as_deref(),
        &args.stage,
        &args.task,
        true,
        output,
        project_root,
    )
}

pub fn run_reopen(args: &ReopenArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    toggle(
        args.project.as_deref(),
        &args.stage,
        &args.task,
        false,
        output,
        project_root,
    )
}

fn toggle(
    project: Option<&str>,
    stage_id: &str,
    task_id: &str,
    completed: bool,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let outcome = snapshot::with_store(project_root, |store| {
        let Some(project_id) = resolve_project_id(store.state(), project) else {
            return Ok(Err(no_project_error()));
        };

        let result = if completed {
            store.complete_task(&project_id, stage_id, task_id)
        } else {
            store.reopen_task(&project_id, stage_id, task_id)
        };
        if let Err(err) = result {
            return Ok(Err(store_error(&err)));
        }

        let project = store
            .state()
            .project(&project_id)
            .ok_or_else(|| anyhow::anyhow!("project vanished mid-operation"))?;
        let stage = project
            .stage(stage_id)
            .ok_or_else(|| anyhow::anyhow!("stage vanished mid-operation"))?;
        Ok(Ok(ToggleOutput {
            ok: true,
            project_id: project_id.clone(),
            stage_id: stage_id.to_string(),
            task_id: task_id.to_string(),
            completed,
            stage_progress: stage.progress,
            project_progress: project.progress,
        }))
    })?;

    match outcome {
        Ok(result) => render(output, &result, |r, w| {
            let verb = if r.completed { "completed" } else { "reopened" };
            writeln!(
                w,
                "✓ {}: task {verb} (stage {}%, project {}%)",
                r.task_id, r.stage_progress, r.project_progress
            )
        }),
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!("{}", cli_err.error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DoneArgs, ReopenArgs, run_done, run_reopen};
    use crate::output::OutputMode;
    use chantier_core::model::status::StageStatus;
    use chantier_core::model::{NewProject, NewStage, NewTask};
    use chantier_core::ProjectStore;
    use chrono::NaiveDate;
    use clap::Parser;

    #[derive(Parser)]
    struct DoneWrapper {
        #[command(flatten)]
        args: DoneArgs,
    }

    fn setup(dir: &std::path::Path) -> (String, String, Vec<String>) {
        std::fs::create_dir_all(dir.join(".chantier")).expect("mkdir");
        let mut store = ProjectStore::new();
        let id = store.add_project(NewProject {
            title: "Salle de bain".into(),
            description: String::new(),
            location: "Tours".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 4, 6).expect("date"),
            end_date: None,
            budget: 9_500,
            contractor: None,
            stages: vec![NewStage {
                title: "Carrelage".into(),
                description: String::new(),
                start_date: NaiveDate::from_ymd_opt(2026, 4, 6).expect("date"),
                end_date: None,
                status: StageStatus::InProgress,
                tasks: vec![
                    NewTask {
                        title: "Préparer le support".into(),
                        completed: false,
                        assignee: None,
                    },
                    NewTask {
                        title: "Poser le carrelage".into(),
                        completed: false,
                        assignee: None,
                    },
                ],
            }],
        });
        store.set_active_project(Some(&id));

        let stage_id = store.state().project(&id).expect("project").stages[0].id.clone();
        let task_ids = store.state().project(&id).expect("project").stages[0]
            .tasks
            .iter()
            .map(|t| t.id.clone())
            .collect();
        crate::snapshot::save_state(
            &dir.join(".chantier/projects.json"),
            store.state(),
        )
        .expect("save");
        (id, stage_id, task_ids)
    }

    #[test]
    fn done_args_parse() {
        let w = DoneWrapper::parse_from(["test", "stg-1", "tsk-1", "-p", "PRJ-2026-abc123"]);
        assert_eq!(w.args.stage, "stg-1");
        assert_eq!(w.args.task, "tsk-1");
        assert_eq!(w.args.project.as_deref(), Some("PRJ-2026-abc123"));
    }

    #[test]
    fn done_then_reopen_roundtrips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (id, stage_id, task_ids) = setup(dir.path());

        run_done(
            &DoneArgs {
                stage: stage_id.clone(),
                task: task_ids[0].clone(),
                project: None,
            },
            OutputMode::Json,
            dir.path(),
        )
        .expect("done");

        let store = crate::snapshot::read_store(dir.path()).expect("reload");
        let stage = &store.state().project(&id).expect("project").stages[0];
        assert!(stage.tasks[0].completed);
        assert_eq!(stage.progress, 50);

        run_reopen(
            &ReopenArgs {
                stage: stage_id,
                task: task_ids[0].clone(),
                project: Some(id.clone()),
            },
            OutputMode::Json,
            dir.path(),
        )
        .expect("reopen");

        let store = crate::snapshot::read_store(dir.path()).expect("reload");
        let stage = &store.state().project(&id).expect("project").stages[0];
        assert!(!stage.tasks[0].completed);
        assert_eq!(stage.progress, 0);
    }

    #[test]
    fn done_unknown_task_fails_and_changes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (id, stage_id, _task_ids) = setup(dir.path());

        let result = run_done(
            &DoneArgs {
                stage: stage_id,
                task: "tsk-nope00".into(),
                project: None,
            },
            OutputMode::Json,
            dir.path(),
        );
        assert!(result.is_err());

        let store = crate::snapshot::read_store(dir.path()).expect("reload");
        let stage = &store.state().project(&id).expect("project").stages[0];
        assert!(stage.tasks.iter().all(|t| !t.completed));
    }
}
