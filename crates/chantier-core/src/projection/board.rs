//! The kanban board: an alternate grouping of the same task tree.
//!
//! Rebuilt from scratch on every render with one pass over every stage and
//! task. Task counts per project are small (tens, not thousands), so the
//! simple full rebuild wins over incremental diffing.

use serde::Serialize;
use std::fmt;

use crate::model::status::StageStatus;
use crate::model::{Project, Task};
use crate::store::Action;

/// The three board buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardColumn {
    Pending,
    InProgress,
    Completed,
}

impl BoardColumn {
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Pending => "À venir",
            Self::InProgress => "En cours",
            Self::Completed => "Terminé",
        }
    }
}

impl fmt::Display for BoardColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// One task card with enough owning-stage context to act on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardCard {
    pub project_id: String,
    pub stage_id: String,
    pub stage_title: String,
    pub task: Task,
}

/// The derived three-column view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Board {
    pub pending: Vec<BoardCard>,
    pub in_progress: Vec<BoardCard>,
    pub completed: Vec<BoardCard>,
}

impl Board {
    #[must_use]
    pub fn column(&self, column: BoardColumn) -> &[BoardCard] {
        match column {
            BoardColumn::Pending => &self.pending,
            BoardColumn::InProgress => &self.in_progress,
            BoardColumn::Completed => &self.completed,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len() + self.in_progress.len() + self.completed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bucket of a single task: its own completed flag wins over everything;
/// otherwise the owning stage's status decides between in-progress and
/// pending.
#[must_use]
pub const fn bucket_for(stage_status: StageStatus, completed: bool) -> BoardColumn {
    if completed {
        BoardColumn::Completed
    } else if matches!(stage_status, StageStatus::InProgress) {
        BoardColumn::InProgress
    } else {
        BoardColumn::Pending
    }
}

/// Single pass over every stage and task of a project.
#[must_use]
pub fn build_board(project: &Project) -> Board {
    let mut board = Board::default();
    for stage in &project.stages {
        for task in &stage.tasks {
            let card = BoardCard {
                project_id: project.id.clone(),
                stage_id: stage.id.clone(),
                stage_title: stage.title.clone(),
                task: task.clone(),
            };
            match bucket_for(stage.status, task.completed) {
                BoardColumn::Pending => board.pending.push(card),
                BoardColumn::InProgress => board.in_progress.push(card),
                BoardColumn::Completed => board.completed.push(card),
            }
        }
    }
    board
}

/// Translate a drop gesture into a store action.
///
/// Only dropping a not-yet-completed card on the completed column mutates
/// anything; every other target is a no-op. The asymmetry (no un-complete
/// via drag, no pending/in-progress reassignment) is intentional product
/// behavior, not an oversight.
#[must_use]
pub fn drop_action(card: &BoardCard, target: BoardColumn) -> Option<Action> {
    if target == BoardColumn::Completed && !card.task.completed {
        return Some(Action::SetTaskCompletion {
            project_id: card.project_id.clone(),
            stage_id: card.stage_id.clone(),
            task_id: card.task.id.clone(),
            completed: true,
        });
    }
    None
}
