//! The project store: single source of truth for every project.
//!
//! All mutations are funneled through [`action::transition`], one at a
//! time, so two mutation requests can never interleave partial updates.
//! The facade methods mint ids and timestamps at the edge, keeping the
//! transition function deterministic.

pub mod action;

use chrono::Utc;
use serde::{Deserialize, Serialize};

pub use action::{Action, transition};

use crate::error::StoreError;
use crate::model::id::{new_project_id, new_short_id};
use crate::model::status::StageStatus;
use crate::model::{
    Comment, Document, NewDocument, NewProject, NewTask, NewUpdate, Photo, Project, ProjectPatch,
    Stage, Task, Update, UserRef,
};

/// One consistent snapshot: the project collection plus the active-project
/// pointer shared by all read-side consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_project_id: Option<String>,
}

impl StoreState {
    #[must_use]
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    /// Resolve the active pointer. A dangling or unset pointer is simply
    /// "no active project", never an error.
    #[must_use]
    pub fn active_project(&self) -> Option<&Project> {
        self.active_project_id
            .as_deref()
            .and_then(|id| self.project(id))
    }
}

/// Stateful facade over the reducer. Owns the current snapshot.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    state: StoreState,
}

impl ProjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn from_state(state: StoreState) -> Self {
        Self { state }
    }

    #[must_use]
    pub const fn state(&self) -> &StoreState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> StoreState {
        self.state
    }

    /// Run one action through the transition function and commit the
    /// resulting snapshot. On error the snapshot is unchanged.
    pub fn dispatch(&mut self, action: &Action) -> Result<(), StoreError> {
        let state = std::mem::take(&mut self.state);
        let (next, result) = action::transition(state, action);
        self.state = next;
        if let Err(err) = &result {
            tracing::debug!(%err, code = err.code(), "store operation was a no-op");
        }
        result
    }

    /// Create a project from caller input. Mints the project id and all
    /// stage/task ids, derives progress, commits, and returns the new id.
    /// The new project is not auto-selected as active.
    pub fn add_project(&mut self, input: NewProject) -> String {
        let project = self.materialize(input);
        let id = project.id.clone();
        if let Err(err) = self.dispatch(&Action::AddProject { project }) {
            // Unreachable: insertion of a freshly minted id cannot fail.
            tracing::warn!(%err, "add_project rejected");
        }
        id
    }

    pub fn update_project(
        &mut self,
        project_id: &str,
        patch: ProjectPatch,
    ) -> Result<(), StoreError> {
        self.dispatch(&Action::UpdateProject {
            project_id: project_id.to_string(),
            patch,
        })
    }

    pub fn delete_project(&mut self, project_id: &str) -> Result<(), StoreError> {
        self.dispatch(&Action::DeleteProject {
            project_id: project_id.to_string(),
        })
    }

    /// Move the active pointer. No validation, by design: consumers handle
    /// a dangling pointer as "no active project".
    pub fn set_active_project(&mut self, project_id: Option<&str>) {
        let action = Action::SetActiveProject {
            project_id: project_id.map(str::to_string),
        };
        if let Err(err) = self.dispatch(&action) {
            tracing::warn!(%err, "set_active_project rejected");
        }
    }

    pub fn complete_task(
        &mut self,
        project_id: &str,
        stage_id: &str,
        task_id: &str,
    ) -> Result<(), StoreError> {
        self.set_task_completion(project_id, stage_id, task_id, true)
    }

    /// The board card menu's "un-complete". Symmetric recompute.
    pub fn reopen_task(
        &mut self,
        project_id: &str,
        stage_id: &str,
        task_id: &str,
    ) -> Result<(), StoreError> {
        self.set_task_completion(project_id, stage_id, task_id, false)
    }

    fn set_task_completion(
        &mut self,
        project_id: &str,
        stage_id: &str,
        task_id: &str,
        completed: bool,
    ) -> Result<(), StoreError> {
        self.dispatch(&Action::SetTaskCompletion {
            project_id: project_id.to_string(),
            stage_id: stage_id.to_string(),
            task_id: task_id.to_string(),
            completed,
        })
    }

    /// Append a task to a stage, returning the minted task id.
    pub fn add_task(
        &mut self,
        project_id: &str,
        stage_id: &str,
        input: NewTask,
    ) -> Result<String, StoreError> {
        let task = Task {
            id: new_short_id("tsk"),
            title: input.title,
            completed: input.completed,
            assignee: input.assignee,
        };
        let id = task.id.clone();
        self.dispatch(&Action::AddTask {
            project_id: project_id.to_string(),
            stage_id: stage_id.to_string(),
            task,
        })
        .map(|()| id)
    }

    /// External input for stage status (e.g. a scheduling delay).
    pub fn set_stage_status(
        &mut self,
        project_id: &str,
        stage_id: &str,
        status: StageStatus,
    ) -> Result<(), StoreError> {
        self.dispatch(&Action::SetStageStatus {
            project_id: project_id.to_string(),
            stage_id: stage_id.to_string(),
            status,
        })
    }

    /// Append a comment with a minted id and a now() timestamp. Returns
    /// the comment id. Progress and status are untouched.
    pub fn add_comment(
        &mut self,
        project_id: &str,
        stage_id: &str,
        text: &str,
        author: UserRef,
    ) -> Result<String, StoreError> {
        let comment = Comment {
            id: new_short_id("cmt"),
            author,
            text: text.to_string(),
            timestamp: Utc::now(),
        };
        let id = comment.id.clone();
        self.dispatch(&Action::AddComment {
            project_id: project_id.to_string(),
            stage_id: stage_id.to_string(),
            comment,
        })
        .map(|()| id)
    }

    /// Append a photo by url (uploads are the asset collaborator's job).
    pub fn add_photo(
        &mut self,
        project_id: &str,
        stage_id: &str,
        url: &str,
        caption: Option<&str>,
    ) -> Result<String, StoreError> {
        let photo = Photo {
            id: new_short_id("pht"),
            url: url.to_string(),
            caption: caption.map(str::to_string),
            added_at: Utc::now(),
        };
        let id = photo.id.clone();
        self.dispatch(&Action::AddPhoto {
            project_id: project_id.to_string(),
            stage_id: stage_id.to_string(),
            photo,
        })
        .map(|()| id)
    }

    /// Prepend a site update to the project feed. Returns the update id.
    pub fn add_project_update(
        &mut self,
        project_id: &str,
        input: NewUpdate,
    ) -> Result<String, StoreError> {
        let update = Update {
            id: new_short_id("upd"),
            date: input.date,
            content: input.content,
            photos: input.photos,
            author: input.author,
        };
        let id = update.id.clone();
        self.dispatch(&Action::AddUpdate {
            project_id: project_id.to_string(),
            update,
        })
        .map(|()| id)
    }

    /// Append a document to the project. Returns the document id.
    pub fn add_project_document(
        &mut self,
        project_id: &str,
        input: NewDocument,
    ) -> Result<String, StoreError> {
        let document = Document {
            id: new_short_id("doc"),
            name: input.name,
            kind: input.kind,
            date: input.date,
            url: input.url,
        };
        let id = document.id.clone();
        self.dispatch(&Action::AddDocument {
            project_id: project_id.to_string(),
            document,
        })
        .map(|()| id)
    }

    fn materialize(&self, input: NewProject) -> Project {
        let id = self.mint_unique_project_id();
        let stages = input
            .stages
            .into_iter()
            .map(|s| Stage {
                id: new_short_id("stg"),
                title: s.title,
                description: s.description,
                start_date: s.start_date,
                end_date: s.end_date,
                status: s.status,
                progress: 0,
                tasks: s
                    .tasks
                    .into_iter()
                    .map(|t| Task {
                        id: new_short_id("tsk"),
                        title: t.title,
                        completed: t.completed,
                        assignee: t.assignee,
                    })
                    .collect(),
                photos: vec![],
                comments: vec![],
            })
            .collect();

        Project {
            id,
            title: input.title,
            description: input.description,
            location: input.location,
            start_date: input.start_date,
            end_date: input.end_date,
            budget: input.budget,
            status: crate::model::status::ProjectStatus::Pending,
            progress: 0,
            contractor: input.contractor,
            stages,
            updates: vec![],
            documents: vec![],
        }
    }

    fn mint_unique_project_id(&self) -> String {
        loop {
            let id = new_project_id();
            if self.state.project(&id).is_none() {
                return id;
            }
        }
    }
}
