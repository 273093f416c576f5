//! E2E tests for the annotation surface: comments, photos, journal
//! updates, and documents — none of which may move progress.

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn cht_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cht"));
    cmd.current_dir(dir);
    cmd.env("CHANTIER_USER", "Marie Laurent");
    cmd.env("CHANTIER_LOG", "error");
    cmd
}

const FIXTURE: &str = r#"[
    {"title": "Plomberie", "start_date": "2026-03-16", "status": "in_progress",
     "tasks": [{"title": "Pose conduites", "completed": true}, {"title": "Test pression"}]}
]"#;

fn setup(dir: &Path) -> (String, String) {
    cht_cmd(dir).args(["init"]).assert().success();

    let stages = dir.join("stages.json");
    std::fs::write(&stages, FIXTURE).expect("write fixture");
    let output = cht_cmd(dir)
        .args([
            "create",
            "--title",
            "Salle de bain",
            "--start",
            "2026-03-16",
            "--stages-file",
            stages.to_str().expect("utf-8 path"),
            "--json",
        ])
        .output()
        .expect("create");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let id = json["id"].as_str().expect("id").to_string();

    cht_cmd(dir).args(["active", &id]).assert().success();

    let output = cht_cmd(dir)
        .args(["show", "--json"])
        .output()
        .expect("show");
    let shown: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let stage_id = shown["project"]["stages"][0]["id"]
        .as_str()
        .expect("stage id")
        .to_string();
    (id, stage_id)
}

fn show(dir: &Path) -> Value {
    let output = cht_cmd(dir).args(["show", "--json"]).output().expect("show");
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

#[test]
fn comment_is_attached_with_author_and_changes_no_progress() {
    let dir = TempDir::new().expect("tempdir");
    let (_id, stage_id) = setup(dir.path());

    let before = show(dir.path());

    let output = cht_cmd(dir.path())
        .args(["comment", "add", &stage_id, "Livraison prévue lundi", "--json"])
        .output()
        .expect("comment add");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["author"], "Marie Laurent");

    let after = show(dir.path());
    let comments = after["project"]["stages"][0]["comments"]
        .as_array()
        .expect("comments");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["author"]["name"], "Marie Laurent");
    assert_eq!(comments[0]["text"], "Livraison prévue lundi");
    assert_eq!(after["project"]["progress"], before["project"]["progress"]);
    assert_eq!(
        after["project"]["stages"][0]["progress"],
        before["project"]["stages"][0]["progress"]
    );
}

#[test]
fn comment_requires_an_identity() {
    let dir = TempDir::new().expect("tempdir");
    let (_id, stage_id) = setup(dir.path());

    let output = Command::new(assert_cmd::cargo::cargo_bin!("cht"))
        .current_dir(dir.path())
        .env("CHANTIER_LOG", "error")
        .env_remove("CHANTIER_USER")
        .env_remove("USER")
        .args(["comment", "add", &stage_id, "anonyme ?", "--json"])
        .output()
        .expect("comment add");
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("error JSON");
    assert_eq!(json["code"], "missing_user");
}

#[test]
fn photo_lands_in_the_stage_grid() {
    let dir = TempDir::new().expect("tempdir");
    let (_id, stage_id) = setup(dir.path());

    cht_cmd(dir.path())
        .args([
            "photo",
            "add",
            &stage_id,
            "https://cdn.example/mur.jpg",
            "--caption",
            "Murs posés",
        ])
        .assert()
        .success();

    let after = show(dir.path());
    let photos = after["project"]["stages"][0]["photos"].as_array().expect("photos");
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0]["url"], "https://cdn.example/mur.jpg");
    assert_eq!(photos[0]["caption"], "Murs posés");
}

#[test]
fn journal_updates_are_newest_first() {
    let dir = TempDir::new().expect("tempdir");
    let (_id, _stage_id) = setup(dir.path());

    cht_cmd(dir.path())
        .args(["journal", "add", "Semaine 1 terminée"])
        .assert()
        .success();
    cht_cmd(dir.path())
        .args(["journal", "add", "Semaine 2 terminée"])
        .assert()
        .success();

    let after = show(dir.path());
    let updates = after["project"]["updates"].as_array().expect("updates");
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0]["content"], "Semaine 2 terminée");
    assert_eq!(updates[1]["content"], "Semaine 1 terminée");
    assert_eq!(updates[0]["author"], "Marie Laurent");
}

#[test]
fn documents_append_in_order_with_type_field() {
    let dir = TempDir::new().expect("tempdir");
    let (_id, _stage_id) = setup(dir.path());

    cht_cmd(dir.path())
        .args(["doc", "add", "Devis signé", "--date", "2026-02-14"])
        .assert()
        .success();
    cht_cmd(dir.path())
        .args(["doc", "add", "Permis", "--kind", "pdf", "--date", "2026-02-20"])
        .assert()
        .success();

    let after = show(dir.path());
    let docs = after["project"]["documents"].as_array().expect("documents");
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["name"], "Devis signé");
    assert_eq!(docs[0]["type"], "pdf");
    assert_eq!(docs[1]["name"], "Permis");
}

#[test]
fn unknown_stage_is_a_typed_error() {
    let dir = TempDir::new().expect("tempdir");
    let (_id, _stage_id) = setup(dir.path());

    let output = cht_cmd(dir.path())
        .args(["photo", "add", "stg-nope00", "https://cdn.example/x.jpg", "--json"])
        .output()
        .expect("photo add");
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("error JSON");
    assert_eq!(json["code"], "stage_not_found");
}
