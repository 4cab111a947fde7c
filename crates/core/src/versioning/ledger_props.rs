//! Property-based tests for VersionLedger.
//!
//! Random sequences of edits and rollbacks are replayed against a ledger and
//! the history invariants are checked after every step.

use proptest::prelude::*;

use crate::versioning::error::VersioningError;
use crate::versioning::ledger::VersionLedger;

#[derive(Debug, Clone)]
enum Op {
    Edit(String),
    Rollback(i32),
}

/// Strategy for snapshot content.
fn arb_name() -> impl Strategy<Value = String> {
    "[a-z]{1,12}"
}

/// Strategy for operations. Rollback targets may point past the live version.
fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_name().prop_map(Op::Edit),
        2 => (-2i32..24).prop_map(Op::Rollback),
    ]
}

fn apply(ledger: &mut VersionLedger<String>, op: &Op) -> Result<(), VersioningError> {
    let expected = ledger.version();
    match op {
        Op::Edit(name) => ledger.edit(expected, |_| name.clone()).map(|_| ()),
        Op::Rollback(target) => ledger.rollback(expected, *target).map(|_| ()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// History holds exactly the versions 1..live, each archived once.
    #[test]
    fn prop_history_is_every_superseded_version(
        initial in arb_name(),
        ops in prop::collection::vec(arb_op(), 0..40)
    ) {
        let mut ledger = VersionLedger::new(initial);
        for op in &ops {
            let _ = apply(&mut ledger, op);
        }

        let archived: Vec<i32> = ledger.history().map(|a| a.version).collect();
        let expected: Vec<i32> = (1..ledger.version()).collect();
        prop_assert_eq!(archived, expected);
    }

    /// Successful operations advance the version by exactly one; failed ones
    /// leave the ledger untouched.
    #[test]
    fn prop_success_bumps_by_one_failure_changes_nothing(
        initial in arb_name(),
        ops in prop::collection::vec(arb_op(), 1..40)
    ) {
        let mut ledger = VersionLedger::new(initial);
        for op in &ops {
            let before = ledger.clone();
            match apply(&mut ledger, op) {
                Ok(()) => {
                    prop_assert_eq!(ledger.version(), before.version() + 1);
                    prop_assert_eq!(ledger.history_len(), before.history_len() + 1);
                    prop_assert_eq!(
                        &ledger.archived(before.version()).unwrap().snapshot,
                        before.live()
                    );
                }
                Err(_) => prop_assert_eq!(&ledger, &before),
            }
        }
    }

    /// Rolling back restores exactly the archived snapshot, and can be repeated.
    #[test]
    fn prop_rollback_restores_archived_content(
        names in prop::collection::vec(arb_name(), 2..10),
        pick in any::<prop::sample::Index>()
    ) {
        let mut ledger = VersionLedger::new(names[0].clone());
        for name in &names[1..] {
            let v = ledger.version();
            ledger.edit(v, |_| name.clone()).unwrap();
        }

        let target = i32::try_from(pick.index(names.len() - 1)).unwrap() + 1;
        let archived = ledger.archived(target).unwrap().snapshot.clone();

        let v = ledger.version();
        ledger.rollback(v, target).unwrap();
        prop_assert_eq!(ledger.live(), &archived);

        let v = ledger.version();
        ledger.rollback(v, target).unwrap();
        prop_assert_eq!(ledger.live(), &archived);
    }

    /// Two writers that read the same version cannot both commit.
    #[test]
    fn prop_stale_writer_conflicts(
        initial in arb_name(),
        first in arb_name(),
        second in arb_name()
    ) {
        let mut ledger = VersionLedger::new(initial);
        let read = ledger.version();

        prop_assert!(ledger.edit(read, |_| first.clone()).is_ok());
        let result = ledger.edit(read, |_| second.clone());

        prop_assert_eq!(result, Err(VersioningError::VersionConflict { expected: read }));
        prop_assert_eq!(ledger.live(), &first);
        prop_assert_eq!(ledger.version(), read + 1);
    }

    /// Rolling back to the live version is always rejected.
    #[test]
    fn prop_rollback_to_live_version_rejected(
        initial in arb_name(),
        ops in prop::collection::vec(arb_op(), 0..20)
    ) {
        let mut ledger = VersionLedger::new(initial);
        for op in &ops {
            let _ = apply(&mut ledger, op);
        }

        let before = ledger.clone();
        let v = ledger.version();
        prop_assert_eq!(ledger.rollback(v, v), Err(VersioningError::SameVersion(v)));
        prop_assert_eq!(&ledger, &before);
    }
}
