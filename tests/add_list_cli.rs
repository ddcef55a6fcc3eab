mod support;

use predicates::str::contains;

use support::{parse_stdout, TestStore};

#[test]
fn add_creates_task_with_defaults() {
    let store = TestStore::new();

    store
        .cmd()
        .args(["add", "Write report", "--description", "Quarterly numbers"])
        .assert()
        .success()
        .stdout(contains("Added task #1: Write report"))
        .stdout(contains("status: todo"))
        .stdout(contains("priority: medium"));

    let doc = store.read_store();
    assert_eq!(doc["next_id"].as_u64(), Some(2));
    let tasks = doc["tasks"].as_array().expect("tasks array");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"].as_u64(), Some(1));
    assert_eq!(tasks[0]["title"].as_str(), Some("Write report"));
    assert_eq!(tasks[0]["description"].as_str(), Some("Quarterly numbers"));
    assert_eq!(tasks[0]["status"].as_str(), Some("todo"));
    assert_eq!(tasks[0]["priority"].as_str(), Some("medium"));
    assert_eq!(tasks[0]["tags"].as_array().map(Vec::len), Some(0));
    assert_eq!(tasks[0]["created_at"], tasks[0]["updated_at"]);
    assert!(tasks[0].get("deadline").is_none());
}

#[test]
fn add_assigns_sequential_ids() {
    let store = TestStore::new();

    store.cmd().args(["add", "One"]).assert().success();
    store.cmd().args(["add", "Two"]).assert().success();
    store
        .cmd()
        .args(["add", "Three"])
        .assert()
        .success()
        .stdout(contains("Added task #3: Three"));

    let doc = store.read_store();
    assert_eq!(doc["next_id"].as_u64(), Some(4));
}

#[test]
fn add_rejects_blank_title() {
    let store = TestStore::new();

    store
        .cmd()
        .args(["add", "   "])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("title cannot be empty"));

    assert!(!store.file().exists());
}

#[test]
fn add_json_envelope_has_schema_and_next_step() {
    let store = TestStore::new();

    let output = store
        .cmd()
        .args(["add", "Buy milk", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = parse_stdout(&output);
    assert_eq!(value["schema_version"].as_str(), Some("tsk.v1"));
    assert_eq!(value["command"].as_str(), Some("add"));
    assert_eq!(value["status"].as_str(), Some("success"));
    assert_eq!(value["data"]["id"].as_u64(), Some(1));
    assert_eq!(value["data"]["status"].as_str(), Some("todo"));
    assert_eq!(value["next_steps"][0].as_str(), Some("tsk show 1"));
}

#[test]
fn list_filters_by_status_and_tag() {
    let store = TestStore::new();

    store.cmd().args(["add", "One"]).assert().success();
    store.cmd().args(["add", "Two"]).assert().success();
    store.cmd().args(["add", "Three"]).assert().success();
    store
        .cmd()
        .args(["status", "2", "in_progress"])
        .assert()
        .success();
    store.cmd().args(["tag", "1", "work"]).assert().success();
    store
        .cmd()
        .args(["tag", "2", "work", "deep"])
        .assert()
        .success();

    let output = store
        .cmd()
        .args(["list", "--status", "in_progress", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value = parse_stdout(&output);
    let data = value["data"].as_array().expect("data array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"].as_u64(), Some(2));

    // The tag query normalizes the same way tags do on write.
    let output = store
        .cmd()
        .args(["list", "--tag", "#Work", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value = parse_stdout(&output);
    assert_eq!(value["data"].as_array().map(Vec::len), Some(2));

    let output = store
        .cmd()
        .args(["list", "--status", "todo", "--tag", "work", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value = parse_stdout(&output);
    let data = value["data"].as_array().expect("data array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"].as_u64(), Some(1));
}

#[test]
fn list_sorts_by_priority_with_stable_ties() {
    let store = TestStore::new();

    store.cmd().args(["add", "Low one"]).assert().success();
    store.cmd().args(["add", "High one"]).assert().success();
    store.cmd().args(["add", "Medium one"]).assert().success();
    store.cmd().args(["add", "Medium two"]).assert().success();
    store.cmd().args(["priority", "1", "low"]).assert().success();
    store
        .cmd()
        .args(["priority", "2", "high"])
        .assert()
        .success();

    let output = store
        .cmd()
        .args(["list", "--sort", "priority", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value = parse_stdout(&output);
    let ids: Vec<u64> = value["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|task| task["id"].as_u64().expect("id"))
        .collect();
    assert_eq!(ids, vec![2, 3, 4, 1]);
}

#[test]
fn list_sorts_updated_newest_first() {
    let store = TestStore::new();

    store.cmd().args(["add", "One"]).assert().success();
    store.cmd().args(["add", "Two"]).assert().success();
    store
        .cmd()
        .args(["edit", "1", "--description", "touched"])
        .assert()
        .success();

    let output = store
        .cmd()
        .args(["list", "--sort", "updated", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value = parse_stdout(&output);
    let data = value["data"].as_array().expect("data array");
    assert_eq!(data[0]["id"].as_u64(), Some(1));
    assert_eq!(data[1]["id"].as_u64(), Some(2));
}

#[test]
fn list_rejects_unknown_status_and_sort_key() {
    let store = TestStore::new();

    store
        .cmd()
        .args(["list", "--status", "urgent"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Invalid status 'urgent'"))
        .stderr(contains("todo, in_progress, done"));

    store
        .cmd()
        .args(["list", "--sort", "name"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Invalid sort key 'name'"))
        .stderr(contains("id, created, updated, status, priority"));
}

#[test]
fn empty_list_suggests_adding() {
    let store = TestStore::new();

    store
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No tasks found"))
        .stdout(contains("tsk add"));
}

#[test]
fn search_matches_title_and_description_case_insensitively() {
    let store = TestStore::new();

    store.cmd().args(["add", "Buy milk"]).assert().success();
    store
        .cmd()
        .args(["add", "Call plumber", "--description", "kitchen sink, milk spill"])
        .assert()
        .success();
    store.cmd().args(["add", "Pay rent"]).assert().success();

    let output = store
        .cmd()
        .args(["search", "MILK", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value = parse_stdout(&output);
    assert_eq!(value["data"].as_array().map(Vec::len), Some(2));

    store
        .cmd()
        .args(["search", "zzz"])
        .assert()
        .success()
        .stdout(contains("No tasks match \"zzz\""));
}

#[test]
fn tags_lists_alphabetically_across_tasks() {
    let store = TestStore::new();

    store.cmd().args(["add", "One"]).assert().success();
    store.cmd().args(["add", "Two"]).assert().success();
    store
        .cmd()
        .args(["tag", "1", "work", "errands"])
        .assert()
        .success();
    store
        .cmd()
        .args(["tag", "2", "home", "Work"])
        .assert()
        .success();

    let output = store
        .cmd()
        .args(["tags", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value = parse_stdout(&output);
    let tags: Vec<&str> = value["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|tag| tag.as_str().expect("tag"))
        .collect();
    assert_eq!(tags, vec!["errands", "home", "work"]);

    store
        .cmd()
        .arg("tags")
        .assert()
        .success()
        .stdout(contains("Tags (3)"));
}

#[test]
fn quiet_suppresses_human_output_but_still_saves() {
    let store = TestStore::new();

    store
        .cmd()
        .args(["--quiet", "add", "Silent"])
        .assert()
        .success()
        .stdout("");

    let doc = store.read_store();
    assert_eq!(doc["tasks"][0]["title"].as_str(), Some("Silent"));

    // --json wins over --quiet for scripting.
    let output = store
        .cmd()
        .args(["--quiet", "--json", "list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value = parse_stdout(&output);
    assert_eq!(value["data"].as_array().map(Vec::len), Some(1));
}
