use thiserror::Error;

/// Failures surfaced by store operations.
///
/// Lookup failures leave the snapshot untouched; callers that prefer the
/// silent no-op of a purely client-side store can ignore the `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    #[error("stage '{stage_id}' not found in project '{project_id}'")]
    StageNotFound {
        project_id: String,
        stage_id: String,
    },

    #[error("task '{task_id}' not found in stage '{stage_id}' of project '{project_id}'")]
    TaskNotFound {
        project_id: String,
        stage_id: String,
        task_id: String,
    },
}

impl StoreError {
    /// Stable machine code for JSON error output and agent parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ProjectNotFound(_) => "project_not_found",
            Self::StageNotFound { .. } => "stage_not_found",
            Self::TaskNotFound { .. } => "task_not_found",
        }
    }

    /// Remediation hint for terminal output.
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match self {
            Self::ProjectNotFound(_) => "Check the project id with `cht list`.",
            Self::StageNotFound { .. } => "Check stage ids with `cht show <project>`.",
            Self::TaskNotFound { .. } => "Check task ids with `cht show <project>`.",
        }
    }
}
