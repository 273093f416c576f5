//! The store's mutation vocabulary and its single transition function.
//!
//! Every public store method funnels into [`transition`]. Each action is
//! processed to completion (mutate, recompute, commit) before the next one
//! runs, so no snapshot ever exposes a half-applied mutation. On error the
//! returned state is the input, unchanged.

use serde::{Deserialize, Serialize};

use super::StoreState;
use crate::error::StoreError;
use crate::model::status::StageStatus;
use crate::model::{Comment, Document, Photo, Project, ProjectPatch, Task, Update};
use crate::progress::{recompute_project, recompute_stage};

/// A single store mutation. Ids are minted by the caller (the store
/// facade) so the transition itself stays deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Insert a fully materialized project. Never fails: the id was minted
    /// against the current snapshot.
    AddProject { project: Project },
    /// Shallow-merge fields into an existing project.
    UpdateProject {
        project_id: String,
        patch: ProjectPatch,
    },
    /// Remove a project; clears the active pointer if it pointed there.
    DeleteProject { project_id: String },
    /// Move the active-project pointer. Deliberately unvalidated: readers
    /// treat a dangling pointer as "no active project".
    SetActiveProject { project_id: Option<String> },
    /// Set a task's completion flag. Idempotent on data; the recompute
    /// runs either way.
    SetTaskCompletion {
        project_id: String,
        stage_id: String,
        task_id: String,
        completed: bool,
    },
    /// Append a task to a stage (the board's create form).
    AddTask {
        project_id: String,
        stage_id: String,
        task: Task,
    },
    /// Explicit external input for stage status (scheduling delay and the
    /// like). The recompute still forces `Completed` at 100%.
    SetStageStatus {
        project_id: String,
        stage_id: String,
        status: StageStatus,
    },
    /// Append a comment to a stage. Never touches progress.
    AddComment {
        project_id: String,
        stage_id: String,
        comment: Comment,
    },
    /// Append a photo to a stage. Never touches progress.
    AddPhoto {
        project_id: String,
        stage_id: String,
        photo: Photo,
    },
    /// Prepend a site update to the project feed (newest first).
    AddUpdate { project_id: String, update: Update },
    /// Append a document to the project.
    AddDocument {
        project_id: String,
        document: Document,
    },
}

/// Apply one action to a snapshot, returning the next snapshot.
///
/// Guarantee: when the result is `Err`, the returned state is the input
/// state, bit for bit. Callers can therefore keep dispatching without
/// rollback bookkeeping.
pub fn transition(mut state: StoreState, action: &Action) -> (StoreState, Result<(), StoreError>) {
    let result = apply(&mut state, action);
    (state, result)
}

fn apply(state: &mut StoreState, action: &Action) -> Result<(), StoreError> {
    match action {
        Action::AddProject { project } => {
            let derived = finalize(project.clone());
            tracing::debug!(project_id = %derived.id, "project added");
            state.projects.push(derived);
            Ok(())
        }

        Action::UpdateProject { project_id, patch } => {
            let project = find_project(state, project_id)?;
            patch.apply_to(project);
            *project = recompute_project(project);
            tracing::debug!(%project_id, "project fields updated");
            Ok(())
        }

        Action::DeleteProject { project_id } => {
            let before = state.projects.len();
            state.projects.retain(|p| &p.id != project_id);
            if state.projects.len() == before {
                return Err(StoreError::ProjectNotFound(project_id.clone()));
            }
            if state.active_project_id.as_deref() == Some(project_id) {
                state.active_project_id = None;
            }
            tracing::debug!(%project_id, "project deleted");
            Ok(())
        }

        Action::SetActiveProject { project_id } => {
            state.active_project_id = project_id.clone();
            Ok(())
        }

        Action::SetTaskCompletion {
            project_id,
            stage_id,
            task_id,
            completed,
        } => {
            let project = find_project(state, project_id)?;
            let stage = find_stage(project, project_id, stage_id)?;
            let task = stage.tasks.iter_mut().find(|t| &t.id == task_id).ok_or_else(|| {
                StoreError::TaskNotFound {
                    project_id: project_id.clone(),
                    stage_id: stage_id.clone(),
                    task_id: task_id.clone(),
                }
            })?;
            task.completed = *completed;
            *stage = recompute_stage(stage);
            *project = recompute_project(project);
            tracing::debug!(%project_id, %stage_id, %task_id, completed, "task completion set");
            Ok(())
        }

        Action::AddTask {
            project_id,
            stage_id,
            task,
        } => {
            let project = find_project(state, project_id)?;
            let stage = find_stage(project, project_id, stage_id)?;
            stage.tasks.push(task.clone());
            *stage = recompute_stage(stage);
            *project = recompute_project(project);
            tracing::debug!(%project_id, %stage_id, task_id = %task.id, "task added");
            Ok(())
        }

        Action::SetStageStatus {
            project_id,
            stage_id,
            status,
        } => {
            let project = find_project(state, project_id)?;
            let stage = find_stage(project, project_id, stage_id)?;
            stage.status = *status;
            *stage = recompute_stage(stage);
            *project = recompute_project(project);
            tracing::debug!(%project_id, %stage_id, %status, "stage status set");
            Ok(())
        }

        Action::AddComment {
            project_id,
            stage_id,
            comment,
        } => {
            let project = find_project(state, project_id)?;
            let stage = find_stage(project, project_id, stage_id)?;
            stage.comments.push(comment.clone());
            Ok(())
        }

        Action::AddPhoto {
            project_id,
            stage_id,
            photo,
        } => {
            let project = find_project(state, project_id)?;
            let stage = find_stage(project, project_id, stage_id)?;
            stage.photos.push(photo.clone());
            Ok(())
        }

        Action::AddUpdate { project_id, update } => {
            let project = find_project(state, project_id)?;
            project.updates.insert(0, update.clone());
            Ok(())
        }

        Action::AddDocument {
            project_id,
            document,
        } => {
            let project = find_project(state, project_id)?;
            project.documents.push(document.clone());
            Ok(())
        }
    }
}

/// Derive every stage and the project itself before first commit, so the
/// progress invariants hold from the project's very first snapshot.
fn finalize(mut project: Project) -> Project {
    for stage in &mut project.stages {
        *stage = recompute_stage(stage);
    }
    recompute_project(&project)
}

fn find_project<'a>(
    state: &'a mut StoreState,
    project_id: &str,
) -> Result<&'a mut Project, StoreError> {
    state
        .projects
        .iter_mut()
        .find(|p| p.id == project_id)
        .ok_or_else(|| StoreError::ProjectNotFound(project_id.to_string()))
}

fn find_stage<'a>(
    project: &'a mut Project,
    project_id: &str,
    stage_id: &str,
) -> Result<&'a mut crate::model::Stage, StoreError> {
    project
        .stage_mut(stage_id)
        .ok_or_else(|| StoreError::StageNotFound {
            project_id: project_id.to_string(),
            stage_id: stage_id.to_string(),
        })
}
