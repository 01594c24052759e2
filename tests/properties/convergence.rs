//! Property tests for reconcile convergence.
//!
//! Start from an arbitrary pre-existing store, reconcile, and check the store
//! ends up exactly at the desired state for the challenge.

use proptest::prelude::*;

use tower_operator::domain::entities::{ChildRecord, MovePayload, Phase};
use tower_operator::domain::services::{DesiredState, MoveGenerator, RetryPolicy};
use tower_operator::infrastructure::{MemoryChallengeRepository, MemoryRecordStore};
use tower_operator::{Outcome, ParentIdentity, ReconcileOptions, ReconcileUseCase};

fn demo() -> ParentIdentity {
    ParentIdentity::new("demo").unwrap()
}

fn options() -> ReconcileOptions {
    ReconcileOptions::default().with_retry(RetryPolicy::immediate(3))
}

/// Pre-existing owned records: some in range with garbage payloads, some
/// past the end of the desired sequence.
fn prior_records() -> impl Strategy<Value = Vec<(usize, bool)>> {
    proptest::collection::vec((1usize..=40, any::<bool>()), 0..=12)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: after one successful reconcile the owned records equal the
    /// desired records, whatever the store held before.
    #[test]
    fn property_reconcile_converges(discs in 1i64..=5, prior in prior_records()) {
        let id = demo();
        let repo = MemoryChallengeRepository::new();
        repo.put(&id, discs);

        let store = MemoryRecordStore::with_records(prior.iter().map(|(pos, stale)| {
            let text = if *stale { "stale" } else { "Move disk 1 from A to C" };
            ChildRecord::new(id.record_name(*pos), id.as_str(), MovePayload::new(text))
        }));

        let report = ReconcileUseCase::new(&repo, &store).reconcile(&id, &options());
        prop_assert_eq!(report.outcome.clone(), Outcome::Success);
        prop_assert_eq!(report.final_phase(), Phase::Completed);

        let desired = DesiredState::build(&id, &MoveGenerator::generate(discs).unwrap());
        let mut actual: Vec<ChildRecord> = store.records().into_iter().map(|s| s.record).collect();
        actual.sort_by(|a, b| a.name.cmp(&b.name));
        let mut expected = desired.records().to_vec();
        expected.sort_by(|a, b| a.name.cmp(&b.name));
        prop_assert_eq!(actual, expected);

        let status = repo.status(&id).unwrap();
        prop_assert_eq!(status.steps, desired.steps());
        prop_assert_eq!(status.child_names, desired.names());
    }

    /// PROPERTY: a second reconcile of a converged challenge performs no
    /// store mutations.
    #[test]
    fn property_second_reconcile_is_noop(discs in 1i64..=6) {
        let id = demo();
        let repo = MemoryChallengeRepository::new();
        repo.put(&id, discs);
        let store = MemoryRecordStore::new();
        let use_case = ReconcileUseCase::new(&repo, &store);

        prop_assert!(use_case.reconcile(&id, &options()).outcome.is_success());
        let after_first = store.mutations();

        let second = use_case.reconcile(&id, &options());
        prop_assert!(second.outcome.is_success());
        prop_assert_eq!(second.mutation_count(), 0);
        prop_assert_eq!(store.mutations(), after_first);
    }

    /// PROPERTY: changing the disc count converges to the new sequence from
    /// the old one.
    #[test]
    fn property_resize_converges(from in 1i64..=5, to in 1i64..=5) {
        let id = demo();
        let repo = MemoryChallengeRepository::new();
        let store = MemoryRecordStore::new();
        let use_case = ReconcileUseCase::new(&repo, &store);

        repo.put(&id, from);
        prop_assert!(use_case.reconcile(&id, &options()).outcome.is_success());
        repo.put(&id, to);
        prop_assert!(use_case.reconcile(&id, &options()).outcome.is_success());

        prop_assert_eq!(store.len() as u64, (1u64 << to) - 1);
        for stored in store.records() {
            let position: usize = stored
                .name()
                .strip_prefix("demo-move-")
                .and_then(|n| n.parse().ok())
                .unwrap();
            prop_assert!(position as u64 <= (1u64 << to) - 1);
        }
    }
}
