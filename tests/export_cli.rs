mod support;

use std::fs;

use predicates::str::contains;

use support::{parse_stdout, TestStore};

#[test]
fn export_csv_writes_quoted_rows() {
    let store = TestStore::new();

    store.cmd().args(["add", "Plain"]).assert().success();
    store
        .cmd()
        .args(["add", "Plan, prepare", "--description", "with \"quotes\""])
        .assert()
        .success();
    store
        .cmd()
        .args(["tag", "2", "work", "deep"])
        .assert()
        .success();
    store
        .cmd()
        .args(["deadline", "2", "31.12.2026 18:00"])
        .assert()
        .success();

    store
        .cmd()
        .args(["export", "csv", "--out", "out.csv"])
        .assert()
        .success()
        .stdout(contains("Exported 2 task(s) to out.csv"));

    let content = fs::read_to_string(store.path().join("out.csv")).expect("read export");
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("id,title,description,status,priority,deadline,tags,created_at,updated_at")
    );
    let first = lines.next().expect("first row");
    assert!(first.starts_with("1,Plain,"));
    let second = lines.next().expect("second row");
    assert!(second.starts_with("2,\"Plan, prepare\",\"with \"\"quotes\"\"\","));
    assert!(second.contains("2026-12-31T18:00:00.000000Z"));
    assert!(second.contains("\"work, deep\""));
    assert_eq!(lines.next(), None);
}

#[test]
fn export_markdown_groups_by_status_in_workflow_order() {
    let store = TestStore::new();

    store.cmd().args(["add", "Waiting"]).assert().success();
    store.cmd().args(["add", "Rolling"]).assert().success();
    store
        .cmd()
        .args(["add", "Finished", "--description", "all wrapped up"])
        .assert()
        .success();
    store
        .cmd()
        .args(["status", "2", "in_progress"])
        .assert()
        .success();
    store.cmd().args(["status", "3", "done"]).assert().success();
    store
        .cmd()
        .args(["priority", "1", "high"])
        .assert()
        .success();

    store
        .cmd()
        .args(["export", "markdown", "--out", "tasks.md"])
        .assert()
        .success();

    let content = fs::read_to_string(store.path().join("tasks.md")).expect("read export");
    assert!(content.starts_with("# Tasks\n"));

    let todo = content.find("## \u{1F4CB} todo").expect("todo group");
    let in_progress = content
        .find("## \u{2699}\u{FE0F} in_progress")
        .expect("in_progress group");
    let done = content.find("## \u{2705} done").expect("done group");
    assert!(todo < in_progress && in_progress < done);

    assert!(content.contains("### #1 Waiting \u{1F534}"));
    assert!(content.contains("### #3 Finished \u{1F7E1}"));
    assert!(content.contains("all wrapped up"));
}

#[test]
fn export_md_alias_and_empty_placeholder() {
    let store = TestStore::new();

    store
        .cmd()
        .args(["export", "md", "--out", "empty.md"])
        .assert()
        .success()
        .stdout(contains("Exported 0 task(s)"));

    let content = fs::read_to_string(store.path().join("empty.md")).expect("read export");
    assert!(content.contains("_No tasks yet._"));
}

#[test]
fn export_defaults_file_name_from_format() {
    let store = TestStore::new();

    store.cmd().args(["add", "One"]).assert().success();
    store.cmd().args(["export", "csv"]).assert().success();

    assert!(store.path().join("tasks.csv").exists());
}

#[test]
fn export_rejects_unknown_format() {
    let store = TestStore::new();

    store
        .cmd()
        .args(["export", "xml"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Invalid export format 'xml'"))
        .stderr(contains("csv, md, markdown"));
}

#[test]
fn export_json_envelope_reports_path_and_count() {
    let store = TestStore::new();

    store.cmd().args(["add", "One"]).assert().success();
    store.cmd().args(["add", "Two"]).assert().success();

    let output = store
        .cmd()
        .args(["export", "csv", "--out", "data.csv", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value = parse_stdout(&output);
    assert_eq!(value["command"].as_str(), Some("export"));
    assert_eq!(value["data"]["format"].as_str(), Some("csv"));
    assert_eq!(value["data"]["tasks"].as_u64(), Some(2));
    assert_eq!(value["data"]["path"].as_str(), Some("data.csv"));
}
