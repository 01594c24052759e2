//! Property tests for ownership: records of other challenges are never
//! touched, whatever their names.

use proptest::prelude::*;

use tower_operator::domain::entities::{ChildRecord, MovePayload};
use tower_operator::domain::services::RetryPolicy;
use tower_operator::infrastructure::{MemoryChallengeRepository, MemoryRecordStore};
use tower_operator::{ParentIdentity, ReconcileOptions, ReconcileUseCase};

fn foreign_record() -> impl Strategy<Value = (String, String)> {
    (
        prop_oneof![Just("other"), Just("alpha"), Just("zeta")],
        1usize..=20,
    )
        .prop_map(|(owner, pos)| (owner.to_string(), format!("{owner}-move-{pos}")))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: reconciling one challenge leaves every foreign record with
    /// its original version and payload.
    #[test]
    fn property_foreign_records_survive(
        discs in 1i64..=4,
        foreign in proptest::collection::vec(foreign_record(), 0..=10),
    ) {
        let id = ParentIdentity::new("demo").unwrap();
        let repo = MemoryChallengeRepository::new();
        repo.put(&id, discs);

        let store = MemoryRecordStore::with_records(foreign.iter().map(|(owner, name)| {
            ChildRecord::new(name.clone(), owner.clone(), MovePayload::new("theirs"))
        }));
        let before: Vec<_> = store
            .records()
            .into_iter()
            .filter(|r| r.record.owner_tag != "demo")
            .collect();

        let options = ReconcileOptions::default().with_retry(RetryPolicy::immediate(2));
        let report = ReconcileUseCase::new(&repo, &store).reconcile(&id, &options);
        prop_assert!(report.outcome.is_success());

        for original in before {
            let now = store
                .records()
                .into_iter()
                .find(|r| r.name() == original.name());
            prop_assert_eq!(now, Some(original));
        }
    }

    /// PROPERTY: changing a disc count to an invalid value never
    /// deletes anything.
    #[test]
    fn property_invalid_spec_deletes_nothing(discs in 1i64..=4, bad in -5i64..=0) {
        let id = ParentIdentity::new("demo").unwrap();
        let repo = MemoryChallengeRepository::new();
        let store = MemoryRecordStore::new();
        let use_case = ReconcileUseCase::new(&repo, &store);
        let options = ReconcileOptions::default().with_retry(RetryPolicy::immediate(2));

        repo.put(&id, discs);
        prop_assert!(use_case.reconcile(&id, &options).outcome.is_success());
        let count = store.len();

        repo.put(&id, bad);
        let report = use_case.reconcile(&id, &options);
        prop_assert!(!report.outcome.is_success());
        prop_assert!(!report.outcome.is_retryable());
        prop_assert_eq!(store.len(), count);
    }
}
