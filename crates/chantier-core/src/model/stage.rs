use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::status::StageStatus;

/// Reference to a person (current user, assignee, comment author) as
/// supplied by the identity collaborator. Never authenticated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserRef {
    /// Build a reference from a display name, deriving a stable slug id.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let id = name
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect::<String>();
        Self {
            id,
            name: name.trim().to_string(),
            avatar: None,
        }
    }
}

/// The smallest unit of completable work within a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserRef>,
}

/// A comment on a stage. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: UserRef,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A progress photo attached to a stage. Append-only; the url comes from
/// the asset-upload collaborator, uploads never happen here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// An ordered phase of a construction project. Order within the owning
/// project is the construction sequence and is never re-sorted.
///
/// `progress` and `status` are derived fields: the store recomputes them
/// through the progress engine after every mutation that can change them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub status: StageStatus,
    pub progress: u8,
    pub tasks: Vec<Task>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<Photo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

impl Stage {
    /// Count of tasks flagged completed.
    #[must_use]
    pub fn completed_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}

/// Input for a stage supplied at project construction time. Stages are not
/// added incrementally; they arrive with the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStage {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: StageStatus,
    #[serde(default)]
    pub tasks: Vec<NewTask>,
}

/// Input for a task, either at construction time or via the board's
/// create form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserRef>,
}
