//! The progress engine: pure derivation of progress percentages and the
//! completed-at-100 status rule.
//!
//! Nothing here mutates its input or performs I/O. The store calls these
//! after every mutation that can change completion counts and commits the
//! returned values; projections may call them to cross-check derived state.

use crate::model::status::{ProjectStatus, StageStatus};
use crate::model::{Project, Stage};

/// Integer percentage with round-half-up semantics: 1 of 3 → 33, 2 of 3 → 67.
/// Zero `total` yields 0 rather than dividing.
#[must_use]
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // Round half up in integer arithmetic; values stay well inside u64.
    let scaled = (completed as u64 * 200 + total as u64) / (total as u64 * 2);
    u8::try_from(scaled).unwrap_or(100)
}

/// Derive a stage's progress from its task completion ratio.
///
/// Status is forced to `Completed` only at 100%; below that it is left
/// exactly as externally set (`Pending`, `InProgress`, or `Delayed`).
#[must_use]
pub fn recompute_stage(stage: &Stage) -> Stage {
    let mut next = stage.clone();
    next.progress = percent(stage.completed_tasks(), stage.tasks.len());
    if next.progress == 100 {
        next.status = StageStatus::Completed;
    }
    next
}

/// Derive a project's progress from its completed-stage ratio.
///
/// Same forcing rule as stages: 100% forces `Completed`, anything below
/// leaves the externally set status (including `Cancelled`) untouched.
#[must_use]
pub fn recompute_project(project: &Project) -> Project {
    let mut next = project.clone();
    next.progress = percent(project.completed_stages(), project.stages.len());
    if next.progress == 100 {
        next.status = ProjectStatus::Completed;
    }
    next
}
