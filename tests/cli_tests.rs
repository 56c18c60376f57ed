use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn script_review() -> Command {
    Command::cargo_bin("script-review").unwrap()
}

#[test]
fn reasons_prints_the_catalogue() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("review.db");

    script_review()
        .args(["--db", db.to_str().unwrap(), "reasons"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tone_mismatch"))
        .stdout(predicate::str::contains("Other (please specify)"));
}

#[test]
fn import_then_stats_reports_pending_scripts() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("review.db");
    let julie = dir.path().join("scripts/julie");
    fs::create_dir_all(&julie).unwrap();
    fs::write(
        julie.join("2102-05-15_0800_julie_weather.txt"),
        "Rain over the ridge this morning.",
    )
    .unwrap();

    script_review()
        .args(["--db", db.to_str().unwrap(), "import"])
        .arg(dir.path().join("scripts"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 scripts"));

    script_review()
        .args(["--db", db.to_str().unwrap(), "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending:    1"))
        .stdout(predicate::str::contains("julie"));
}

#[test]
fn import_refuses_a_remote_server() {
    let dir = tempfile::tempdir().unwrap();

    script_review()
        .args(["--server", "http://localhost:8000", "import"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("local library"));
}

#[test]
fn unknown_status_filter_is_rejected_before_launch() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("review.db");

    script_review()
        .args(["--db", db.to_str().unwrap(), "--status", "bogus", "review"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown review status"));
}
