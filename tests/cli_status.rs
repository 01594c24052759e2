mod common;

use common::TestEnv;

#[test]
fn test_status_before_first_reconcile_is_pending() {
    let env = TestEnv::new();
    env.write_manifest("demo", 2);

    let result = env.run(&["status", "demo"]);

    assert!(result.success, "stderr: {}", result.stderr);
    assert_eq!(result.stdout.trim(), "demo: Pending (discs: 2)");
}

#[test]
fn test_status_lists_steps_with_child_names() {
    let env = TestEnv::new();
    env.write_manifest("demo", 2);
    assert!(env.run(&["reconcile", "demo"]).success);

    let result = env.run(&["status", "demo"]);

    assert!(result.success);
    assert!(result.stdout.starts_with("demo: Completed (discs: 2)"));
    assert!(result
        .stdout
        .contains("2. Move disk 2 from A to C  [demo-move-2]"));
}

#[test]
fn test_status_json_is_the_status_document() {
    let env = TestEnv::new();
    env.write_manifest("demo", 0);
    env.run(&["reconcile", "demo"]);

    let result = env.run(&["--json", "status", "demo"]);

    assert!(result.success);
    let status: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(status["phase"], "Failed");
    assert_eq!(status, env.status("demo").unwrap());
}

#[test]
fn test_status_unknown_challenge_fails() {
    let env = TestEnv::new();

    let result = env.run(&["status", "ghost"]);

    assert!(!result.success);
    assert!(result.stderr.contains("challenge 'ghost' not found"));
}
