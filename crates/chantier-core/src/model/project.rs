use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::stage::{NewStage, Stage};
use super::status::ProjectStatus;

/// Reference to the contractor running the project, as supplied by the
/// marketplace collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contractor {
    pub id: String,
    pub name: String,
    pub rating: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// A document attached to a project (quote, permit, invoice). Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A site update posted to a project's feed. Stored newest-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub id: String,
    pub date: DateTime<Utc>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    pub author: String,
}

/// A construction project: the aggregate root.
///
/// `progress` and `status` are derived from the stage sequence; the store
/// recomputes them via the progress engine before committing any snapshot
/// that could have changed them. `progress == 100` iff `status == Completed`
/// once the project has left `add_project` (modulo an explicit `Cancelled`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Currency-agnostic integer units.
    pub budget: i64,
    pub status: ProjectStatus,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contractor: Option<Contractor>,
    pub stages: Vec<Stage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updates: Vec<Update>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<Document>,
}

impl Project {
    /// Count of stages whose own status is completed.
    #[must_use]
    pub fn completed_stages(&self) -> usize {
        self.stages
            .iter()
            .filter(|s| s.status == crate::model::status::StageStatus::Completed)
            .count()
    }

    pub fn stage(&self, stage_id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    pub(crate) fn stage_mut(&mut self, stage_id: &str) -> Option<&mut Stage> {
        self.stages.iter_mut().find(|s| s.id == stage_id)
    }
}

/// Input for `add_project`. The store mints the project id and all stage
/// and task ids, then derives progress before committing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub budget: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contractor: Option<Contractor>,
    #[serde(default)]
    pub stages: Vec<NewStage>,
}

/// Input for `add_project_update`. The store mints the id and prepends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUpdate {
    pub date: DateTime<Utc>,
    pub content: String,
    #[serde(default)]
    pub photos: Vec<String>,
    pub author: String,
}

/// Input for `add_project_document`. The store mints the id and appends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Shallow field merge for `update_project`. `None` leaves the field as-is.
///
/// Derived `progress` is deliberately absent: it is never independently
/// settable. `status` is present because `Cancelled` (and schedule-driven
/// `Pending`/`InProgress`) are external inputs; the recompute still forces
/// `Completed` at 100 afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contractor: Option<Contractor>,
}

impl ProjectPatch {
    /// True when the patch carries no field at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.budget.is_none()
            && self.status.is_none()
            && self.contractor.is_none()
    }

    pub(crate) fn apply_to(&self, project: &mut Project) {
        if let Some(title) = &self.title {
            project.title = title.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(location) = &self.location {
            project.location = location.clone();
        }
        if let Some(start_date) = self.start_date {
            project.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            project.end_date = Some(end_date);
        }
        if let Some(budget) = self.budget {
            project.budget = budget;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(contractor) = &self.contractor {
            project.contractor = Some(contractor.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, ProjectPatch};
    use crate::model::status::{ProjectStatus, StageStatus};
    use crate::model::stage::Stage;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn stage(id: &str, status: StageStatus) -> Stage {
        Stage {
            id: id.to_string(),
            title: format!("stage {id}"),
            description: String::new(),
            start_date: date(2026, 3, 2),
            end_date: None,
            status,
            progress: 0,
            tasks: vec![],
            photos: vec![],
            comments: vec![],
        }
    }

    fn project() -> Project {
        Project {
            id: "PRJ-2026-abc123".into(),
            title: "Rénovation cuisine".into(),
            description: String::new(),
            location: "Lyon 3e".into(),
            start_date: date(2026, 3, 2),
            end_date: None,
            budget: 24_000,
            status: ProjectStatus::InProgress,
            progress: 50,
            contractor: None,
            stages: vec![
                stage("stg-1", StageStatus::Completed),
                stage("stg-2", StageStatus::Pending),
            ],
            updates: vec![],
            documents: vec![],
        }
    }

    #[test]
    fn completed_stages_counts_status_only() {
        assert_eq!(project().completed_stages(), 1);
    }

    #[test]
    fn stage_lookup_by_id() {
        let p = project();
        assert!(p.stage("stg-2").is_some());
        assert!(p.stage("stg-9").is_none());
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut p = project();
        let patch = ProjectPatch {
            title: Some("Rénovation cuisine + salle de bain".into()),
            budget: Some(31_000),
            ..ProjectPatch::default()
        };
        patch.apply_to(&mut p);

        assert_eq!(p.title, "Rénovation cuisine + salle de bain");
        assert_eq!(p.budget, 31_000);
        assert_eq!(p.location, "Lyon 3e");
        assert_eq!(p.status, ProjectStatus::InProgress);
    }

    #[test]
    fn empty_patch_is_detectable() {
        assert!(ProjectPatch::default().is_empty());
        let patch = ProjectPatch {
            budget: Some(1),
            ..ProjectPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn document_type_field_serializes_as_type() {
        let doc = super::Document {
            id: "doc-1".into(),
            name: "Devis signé".into(),
            kind: "pdf".into(),
            date: date(2026, 2, 14),
            url: None,
        };
        let json = serde_json::to_string(&doc).expect("serialize");
        assert!(json.contains("\"type\":\"pdf\""));
    }
}
