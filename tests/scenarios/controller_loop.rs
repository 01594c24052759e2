//! Scenario: the long-running controller converges challenges that exist at
//! startup and ones added while it runs.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tower_operator::application::{ControllerOptions, ControllerUseCase};
use tower_operator::domain::entities::Phase;
use tower_operator::domain::ports::{
    ChallengeRepository, ChildRecordStore, NoopEventSink, ReconcileEventSink,
};
use tower_operator::domain::services::RetryPolicy;
use tower_operator::infrastructure::{FsRecordStore, ManifestRepository};
use tower_operator::{ParentIdentity, ReconcileOptions};

fn options(manifests: &Path) -> ControllerOptions {
    ControllerOptions {
        manifests: manifests.to_path_buf(),
        reconcile: ReconcileOptions::default().with_retry(RetryPolicy::immediate(3)),
        // Short resync so a missed watch event still converges in time
        resync: Duration::from_millis(500),
        requeue_base: Duration::from_millis(50),
        requeue_max: Duration::from_millis(500),
        debounce: Duration::from_millis(50),
    }
}

fn wait_for_phase(repo: &ManifestRepository, name: &str, phase: Phase) -> bool {
    let id = ParentIdentity::new(name).unwrap();
    let deadline = Instant::now() + Duration::from_secs(15);
    while Instant::now() < deadline {
        if let Ok(challenge) = repo.get(&id) {
            if challenge.status.phase == phase {
                return true;
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}

#[test]
fn scenario_controller_converges_existing_and_new_challenges() {
    let manifests = tempfile::tempdir().unwrap();
    let records = tempfile::tempdir().unwrap();

    let repo = ManifestRepository::new(manifests.path());
    repo.write_manifest(&ParentIdentity::new("early").unwrap(), 2)
        .unwrap();

    let controller = ControllerUseCase::new(
        ManifestRepository::new(manifests.path()),
        FsRecordStore::new(records.path()),
        options(manifests.path()),
    );
    let running = Arc::new(AtomicBool::new(true));
    let events: Arc<dyn ReconcileEventSink> = Arc::new(NoopEventSink);

    let (early, late, broken, summary) = std::thread::scope(|scope| {
        let handle = scope.spawn(|| controller.start(running.clone(), events.clone()));

        let early = wait_for_phase(&repo, "early", Phase::Completed);

        repo.write_manifest(&ParentIdentity::new("late").unwrap(), 1)
            .unwrap();
        let late = wait_for_phase(&repo, "late", Phase::Completed);

        repo.write_manifest(&ParentIdentity::new("broken").unwrap(), 0)
            .unwrap();
        let broken = wait_for_phase(&repo, "broken", Phase::Failed);

        // Stop before asserting so a failure cannot leave the loop running
        running.store(false, Ordering::SeqCst);
        let summary = handle.join().unwrap().unwrap();
        (early, late, broken, summary)
    });

    assert!(early, "existing challenge never completed");
    assert!(late, "challenge added while running never completed");
    assert!(broken, "invalid challenge never failed");
    assert!(summary.successes >= 2);
    assert!(summary.terminal_failures >= 1);

    let store = FsRecordStore::new(records.path());
    assert_eq!(store.list("early").unwrap().len(), 3);
    assert_eq!(store.list("late").unwrap().len(), 1);
    assert!(store.list("broken").unwrap().is_empty());
}
