//! Demo dataset: the sample projects `cht init --seed` installs.
//!
//! Built through the public store operations so every derived field goes
//! through the progress engine, exactly like user-driven data.

use chantier_core::model::status::StageStatus;
use chantier_core::model::{
    Contractor, NewDocument, NewProject, NewStage, NewTask, NewUpdate, UserRef,
};
use chantier_core::{ProjectStore, StoreState};
use chrono::{NaiveDate, TimeZone, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn task(title: &str, completed: bool) -> NewTask {
    NewTask {
        title: title.to_string(),
        completed,
        assignee: None,
    }
}

fn assigned(title: &str, completed: bool, assignee: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        completed,
        assignee: Some(UserRef::from_name(assignee)),
    }
}

/// Build the demo snapshot. The first project is selected as active so the
/// TUI opens on something to look at.
#[must_use]
pub fn demo_state() -> StoreState {
    let mut store = ProjectStore::new();

    let renovation = store.add_project(NewProject {
        title: "Rénovation complète appartement Haussmannien".into(),
        description: "Rénovation totale d'un 85m² : démolition, plomberie, électricité, \
                      peinture et pose de parquet."
            .into(),
        location: "Paris 11e".into(),
        start_date: date(2026, 3, 2),
        end_date: Some(date(2026, 8, 28)),
        budget: 85_000,
        contractor: Some(Contractor {
            id: "ctr-bati-plus".into(),
            name: "Bâti Plus Rénovation".into(),
            rating: 4.7,
            photo: None,
        }),
        stages: vec![
            NewStage {
                title: "Démolition".into(),
                description: "Dépose cloisons, évacuation gravats".into(),
                start_date: date(2026, 3, 2),
                end_date: Some(date(2026, 3, 13)),
                status: StageStatus::Pending,
                tasks: vec![
                    task("Protection des parties communes", true),
                    task("Dépose des cloisons", true),
                    task("Évacuation des gravats", true),
                ],
            },
            NewStage {
                title: "Installation plomberie".into(),
                description: "Réseau cuivre cuisine et salle de bain".into(),
                start_date: date(2026, 3, 16),
                end_date: Some(date(2026, 4, 10)),
                status: StageStatus::InProgress,
                tasks: vec![
                    assigned("Traçage des réseaux", true, "Karim Benali"),
                    assigned("Pose des conduites", true, "Karim Benali"),
                    task("Raccordement sanitaires", false),
                    task("Test de pression", false),
                ],
            },
            NewStage {
                title: "Électricité".into(),
                description: "Mise aux normes NF C 15-100".into(),
                start_date: date(2026, 4, 13),
                end_date: Some(date(2026, 5, 15)),
                status: StageStatus::Pending,
                tasks: vec![
                    task("Saignées et gaines", false),
                    task("Tirage des câbles", false),
                    task("Pose du tableau électrique", false),
                ],
            },
            NewStage {
                title: "Peinture et finitions".into(),
                description: "Enduits, peinture, parquet".into(),
                start_date: date(2026, 5, 18),
                end_date: Some(date(2026, 8, 28)),
                status: StageStatus::Pending,
                tasks: vec![
                    task("Enduits de lissage", false),
                    task("Peinture murs et plafonds", false),
                    task("Pose du parquet", false),
                ],
            },
        ],
    });

    let plumbing_stage = store
        .state()
        .project(&renovation)
        .and_then(|p| p.stages.get(1))
        .map(|s| s.id.clone());

    if let Some(stage_id) = plumbing_stage {
        let author = UserRef::from_name("Karim Benali");
        let _ = store.add_comment(
            &renovation,
            &stage_id,
            "Conduites posées côté cuisine, raccordement SDB la semaine prochaine.",
            author,
        );
        let _ = store.add_photo(
            &renovation,
            &stage_id,
            "https://cdn.chantier.example/demo/plomberie-cuisine.jpg",
            Some("Réseau cuivre cuisine"),
        );
    }

    let _ = store.add_project_update(
        &renovation,
        NewUpdate {
            date: Utc.with_ymd_and_hms(2026, 3, 27, 17, 30, 0).single().unwrap_or_default(),
            content: "Fin de la démolition, le chantier est propre et prêt pour la plomberie."
                .into(),
            photos: vec!["https://cdn.chantier.example/demo/demolition-fin.jpg".into()],
            author: "Bâti Plus Rénovation".into(),
        },
    );
    let _ = store.add_project_document(
        &renovation,
        NewDocument {
            name: "Devis signé".into(),
            kind: "pdf".into(),
            date: date(2026, 2, 14),
            url: Some("https://cdn.chantier.example/demo/devis.pdf".into()),
        },
    );

    let extension = store.add_project(NewProject {
        title: "Extension bois 20m²".into(),
        description: "Extension ossature bois avec toiture plate végétalisée.".into(),
        location: "Rennes".into(),
        start_date: date(2026, 6, 1),
        end_date: None,
        budget: 52_000,
        contractor: None,
        stages: vec![
            NewStage {
                title: "Fondations".into(),
                description: "Plots béton et longrines".into(),
                start_date: date(2026, 6, 1),
                end_date: Some(date(2026, 6, 12)),
                status: StageStatus::Pending,
                tasks: vec![task("Terrassement", false), task("Coulage des plots", false)],
            },
            NewStage {
                title: "Ossature et charpente".into(),
                description: String::new(),
                start_date: date(2026, 6, 15),
                end_date: None,
                status: StageStatus::Pending,
                tasks: vec![
                    task("Montage des murs", false),
                    task("Pose de la charpente", false),
                    task("Pare-pluie et contreventement", false),
                ],
            },
        ],
    });

    // Ground delivery slipped: the extension starts delayed.
    let delayed_stage = store
        .state()
        .project(&extension)
        .and_then(|p| p.stages.first())
        .map(|s| s.id.clone());
    if let Some(stage_id) = delayed_stage {
        let _ = store.set_stage_status(&extension, &stage_id, StageStatus::Delayed);
    }

    store.set_active_project(Some(&renovation));
    store.into_state()
}

#[cfg(test)]
mod tests {
    use super::demo_state;
    use chantier_core::model::status::{ProjectStatus, StageStatus};
    use chantier_core::projection::derived_progress;

    #[test]
    fn demo_invariants_hold() {
        let state = demo_state();
        assert_eq!(state.projects.len(), 2);

        let active = state.active_project().expect("active project set");
        assert!(active.title.contains("Haussmannien"));

        // Demolition stage arrived with all tasks done: derived completed.
        assert_eq!(active.stages[0].progress, 100);
        assert_eq!(active.stages[0].status, StageStatus::Completed);

        // 1 of 4 stages completed: 25%.
        assert_eq!(active.progress, 25);
        assert_eq!(active.status, ProjectStatus::Pending);
        assert_eq!(derived_progress(active), active.progress);
    }

    #[test]
    fn demo_carries_annotations() {
        let state = demo_state();
        let active = state.active_project().expect("active project");
        let plumbing = &active.stages[1];

        assert_eq!(plumbing.status, StageStatus::InProgress);
        assert_eq!(plumbing.comments.len(), 1);
        assert_eq!(plumbing.photos.len(), 1);
        assert_eq!(active.updates.len(), 1);
        assert_eq!(active.documents.len(), 1);
    }

    #[test]
    fn demo_has_a_delayed_stage() {
        let state = demo_state();
        let extension = state
            .projects
            .iter()
            .find(|p| p.title.contains("Extension"))
            .expect("extension project");
        assert_eq!(extension.stages[0].status, StageStatus::Delayed);
    }
}
