//! Scenario: someone edits the record store by hand and the next reconcile
//! puts it back.

use crate::common::TestEnv;

#[test]
fn scenario_manual_edits_are_repaired() {
    let env = TestEnv::new();
    env.write_manifest("demo", 2);
    assert!(env.run(&["reconcile", "demo"]).success);

    // Tamper with one record, delete another, add a stale owned one
    env.write_project_file(
        ".tower/records/demo-move-1.json",
        r#"{"name":"demo-move-1","owner":"demo","data":{"move":"Move disk 9 from C to A"},"version":1}"#,
    );
    std::fs::remove_file(env.records_dir().join("demo-move-2.json")).unwrap();
    env.write_project_file(
        ".tower/records/demo-move-9.json",
        r#"{"name":"demo-move-9","owner":"demo","data":{"move":"leftover"},"version":4}"#,
    );

    let result = env.run(&["--json", "reconcile", "demo"]);
    assert!(result.success, "output: {}", result.combined_output());

    let planned = result
        .events()
        .into_iter()
        .find(|e| e["event"] == "planned")
        .unwrap();
    assert_eq!(planned["creates"], 1);
    assert_eq!(planned["updates"], 1);
    assert_eq!(planned["deletes"], 1);
    assert_eq!(planned["unchanged"], 1);

    assert_eq!(
        env.record_names(),
        vec!["demo-move-1", "demo-move-2", "demo-move-3"]
    );
    let repaired = env.record("demo-move-1").unwrap();
    assert_eq!(repaired["data"]["move"], "Move disk 1 from A to B");
    assert_eq!(repaired["version"], 2);
    assert_eq!(env.status("demo").unwrap()["phase"], "Completed");
}

#[test]
fn scenario_corrupt_record_file_fails_terminally() {
    let env = TestEnv::new();
    env.write_manifest("demo", 1);
    env.write_project_file(".tower/records/demo-move-1.json", "{ not json");

    let result = env.run(&["reconcile", "demo"]);

    assert_eq!(result.exit_code, 1, "output: {}", result.combined_output());
    let status = env.status("demo").unwrap();
    assert_eq!(status["phase"], "Converging");
    assert!(status["errorMessage"].is_string());
}

#[test]
fn scenario_corrupt_record_of_another_challenge_is_ignored() {
    let env = TestEnv::new();
    env.write_manifest("demo", 1);
    env.write_project_file(".tower/records/other-move-1.json", "{ not json");

    let result = env.run(&["reconcile", "demo"]);

    assert_eq!(result.exit_code, 0, "output: {}", result.combined_output());
    assert_eq!(env.status("demo").unwrap()["phase"], "Completed");
    assert!(env.record("demo-move-1").is_some());
}
