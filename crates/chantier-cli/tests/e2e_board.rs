//! E2E tests for the board projection command: bucket derivation and the
//! stage-status external input that moves cards between buckets.

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn cht_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cht"));
    cmd.current_dir(dir);
    cmd.env("CHANTIER_USER", "Testeur E2E");
    cmd.env("CHANTIER_LOG", "error");
    cmd
}

const FIXTURE: &str = r#"[
    {"title": "Démolition", "start_date": "2026-03-02", "status": "in_progress",
     "tasks": [{"title": "Dépose cloisons", "completed": true}, {"title": "Évacuation"}]},
    {"title": "Plomberie", "start_date": "2026-03-16",
     "tasks": [{"title": "Pose conduites"}]}
]"#;

fn setup(dir: &Path) -> (String, Value) {
    cht_cmd(dir).args(["init"]).assert().success();
    let stages = dir.join("stages.json");
    std::fs::write(&stages, FIXTURE).expect("write fixture");

    let output = cht_cmd(dir)
        .args([
            "create",
            "--title",
            "Rénovation",
            "--start",
            "2026-03-02",
            "--stages-file",
            stages.to_str().expect("utf-8 path"),
            "--json",
        ])
        .output()
        .expect("create");
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let id = json["id"].as_str().expect("id").to_string();
    cht_cmd(dir).args(["active", &id]).assert().success();

    let output = cht_cmd(dir).args(["show", "--json"]).output().expect("show");
    let shown: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    (id, shown)
}

fn board(dir: &Path) -> Value {
    let output = cht_cmd(dir).args(["board", "--json"]).output().expect("board");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn titles(bucket: &Value) -> Vec<String> {
    bucket
        .as_array()
        .expect("bucket array")
        .iter()
        .map(|c| c["task"]["title"].as_str().expect("title").to_string())
        .collect()
}

#[test]
fn buckets_follow_the_precedence_rule() {
    let dir = TempDir::new().expect("tempdir");
    let (_id, _shown) = setup(dir.path());

    let b = board(dir.path());
    // Completed flag wins: the done demolition task is completed even
    // though its stage is merely in progress.
    assert_eq!(titles(&b["board"]["completed"]), vec!["Dépose cloisons"]);
    // Open task in an in-progress stage.
    assert_eq!(titles(&b["board"]["in_progress"]), vec!["Évacuation"]);
    // Open task in a pending stage.
    assert_eq!(titles(&b["board"]["pending"]), vec!["Pose conduites"]);
}

#[test]
fn stage_status_input_rebuckets_open_tasks() {
    let dir = TempDir::new().expect("tempdir");
    let (_id, shown) = setup(dir.path());
    let plumbing_id = shown["project"]["stages"][1]["id"].as_str().expect("stage id");

    cht_cmd(dir.path())
        .args(["stage", "status", plumbing_id, "in_progress"])
        .assert()
        .success();

    let b = board(dir.path());
    assert!(titles(&b["board"]["in_progress"]).contains(&"Pose conduites".to_string()));
    assert!(titles(&b["board"]["pending"]).is_empty());

    // Delayed sends open tasks back to pending.
    cht_cmd(dir.path())
        .args(["stage", "status", plumbing_id, "delayed"])
        .assert()
        .success();
    let b = board(dir.path());
    assert!(titles(&b["board"]["pending"]).contains(&"Pose conduites".to_string()));
}

#[test]
fn task_add_appears_in_its_stage_bucket() {
    let dir = TempDir::new().expect("tempdir");
    let (_id, shown) = setup(dir.path());
    let demolition_id = shown["project"]["stages"][0]["id"].as_str().expect("stage id");

    let output = cht_cmd(dir.path())
        .args(["task", "add", demolition_id, "--title", "Tri des déchets", "--json"])
        .output()
        .expect("task add");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert!(json["task_id"].as_str().expect("task id").starts_with("tsk-"));

    let b = board(dir.path());
    assert!(titles(&b["board"]["in_progress"]).contains(&"Tri des déchets".to_string()));
}

#[test]
fn board_of_unknown_project_is_a_typed_error() {
    let dir = TempDir::new().expect("tempdir");
    let (_id, _shown) = setup(dir.path());

    let output = cht_cmd(dir.path())
        .args(["board", "PRJ-2026-nope00", "--json"])
        .output()
        .expect("board");
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("error JSON");
    assert_eq!(json["code"], "project_not_found");
}

#[test]
fn board_without_selection_asks_for_one() {
    let dir = TempDir::new().expect("tempdir");
    cht_cmd(dir.path()).args(["init"]).assert().success();

    let output = cht_cmd(dir.path())
        .args(["board", "--json"])
        .output()
        .expect("board");
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("error JSON");
    assert_eq!(json["code"], "no_active_project");
}
