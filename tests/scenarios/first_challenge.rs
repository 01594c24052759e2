//! Scenario: an operator previews, creates, resizes and breaks a challenge.

use crate::common::TestEnv;

#[test]
fn scenario_challenge_lifecycle() {
    let env = TestEnv::new();

    // Preview the moves before committing to a manifest
    let preview = env.run(&["moves", "3"]);
    assert!(preview.success);
    assert_eq!(preview.stdout.lines().count(), 7);

    // Create the challenge and converge it
    env.write_manifest("hanoi", 3);
    let first = env.run(&["reconcile", "hanoi"]);
    assert_eq!(first.exit_code, 0, "output: {}", first.combined_output());
    assert_eq!(env.record_names().len(), 7);
    assert_eq!(
        env.record("hanoi-move-4").unwrap()["data"]["move"],
        "Move disk 3 from A to C"
    );

    let status = env.run(&["status", "hanoi"]);
    assert!(status.stdout.starts_with("hanoi: Completed (discs: 3)"));

    // Shrink to two discs: the tail is pruned, the head is rewritten
    env.write_manifest("hanoi", 2);
    let shrink = env.run(&["reconcile", "hanoi"]);
    assert!(shrink.success, "output: {}", shrink.combined_output());
    assert_eq!(
        env.record_names(),
        vec!["hanoi-move-1", "hanoi-move-2", "hanoi-move-3"]
    );
    assert_eq!(
        env.record("hanoi-move-1").unwrap()["data"]["move"],
        "Move disk 1 from A to B"
    );
    assert_eq!(
        env.status("hanoi").unwrap()["steps"],
        serde_json::json!([
            "Move disk 1 from A to B",
            "Move disk 2 from A to C",
            "Move disk 1 from B to C"
        ])
    );

    // An invalid spec fails terminally and leaves the records alone
    env.write_manifest("hanoi", -1);
    let broken = env.run(&["reconcile", "hanoi"]);
    assert_eq!(broken.exit_code, 1);
    assert_eq!(env.record_names().len(), 3);
    let failed = env.status("hanoi").unwrap();
    assert_eq!(failed["phase"], "Failed");
    assert_eq!(failed["steps"], serde_json::json!([]));
    assert_eq!(failed["childNames"], serde_json::json!([]));

    // Fixing the spec recovers without touching the already-correct records
    env.write_manifest("hanoi", 2);
    let fixed = env.run(&["--json", "reconcile", "hanoi"]);
    assert!(fixed.success);
    assert!(!fixed.events().iter().any(|e| {
        e["event"] == "record_created"
            || e["event"] == "record_updated"
            || e["event"] == "record_deleted"
    }));
    let recovered = env.status("hanoi").unwrap();
    assert_eq!(recovered["phase"], "Completed");
    assert!(recovered.get("errorMessage").is_none());
}

#[test]
fn scenario_two_challenges_share_a_store() {
    let env = TestEnv::new();
    env.write_manifest("left", 1);
    env.write_manifest("right", 2);

    assert!(env.run(&["reconcile", "left"]).success);
    assert!(env.run(&["reconcile", "right"]).success);
    assert_eq!(env.record_names().len(), 4);

    // Shrinking one challenge never prunes the other's records
    env.write_manifest("right", 1);
    assert!(env.run(&["reconcile", "right"]).success);
    assert_eq!(env.record_names(), vec!["left-move-1", "right-move-1"]);
}
