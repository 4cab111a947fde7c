//! In-memory model of the versioned store, used to check the planning rules
//! against random edit and rollback sequences.
//!
//! `VersionLedger` keeps one live snapshot plus its archived predecessors and
//! applies the same contract as the database store: archive the superseded
//! state, overwrite, and only if the caller's expected version is still live.
//! Every mutation either fully applies or leaves the ledger untouched.

use std::collections::BTreeMap;

use crate::versioning::error::VersioningError;
use crate::versioning::service::VersionService;
use crate::versioning::types::{INITIAL_VERSION, VersionStep};

/// Snapshot of a state the ledger held in the past.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedVersion<S> {
    /// Version number the snapshot represented while it was live.
    pub version: i32,
    /// The versioned fields as they were.
    pub snapshot: S,
}

/// Live snapshot plus append-only history, keyed by version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLedger<S> {
    live: S,
    version: i32,
    history: BTreeMap<i32, ArchivedVersion<S>>,
}

impl<S: Clone> VersionLedger<S> {
    /// Creates a ledger holding `initial` at version 1 with empty history.
    pub fn new(initial: S) -> Self {
        Self {
            live: initial,
            version: INITIAL_VERSION,
            history: BTreeMap::new(),
        }
    }

    /// Returns the live version.
    #[must_use]
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Returns the live snapshot.
    #[must_use]
    pub fn live(&self) -> &S {
        &self.live
    }

    /// Returns the archived snapshot for `version`, if any.
    #[must_use]
    pub fn archived(&self, version: i32) -> Option<&ArchivedVersion<S>> {
        self.history.get(&version)
    }

    /// Iterates archived snapshots in ascending version order.
    pub fn history(&self) -> impl Iterator<Item = &ArchivedVersion<S>> {
        self.history.values()
    }

    /// Returns the number of archived snapshots.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Replaces the live content with `apply(live)` if `expected` is still live.
    ///
    /// # Errors
    ///
    /// * `VersionConflict` if the live version moved past `expected`
    /// * `VersionOverflow` if the counter cannot be advanced
    pub fn edit<F>(&mut self, expected: i32, apply: F) -> Result<VersionStep, VersioningError>
    where
        F: FnOnce(&S) -> S,
    {
        self.check_expected(expected)?;
        let step = VersionService::plan_edit(self.version)?;
        let content = apply(&self.live);
        self.commit(step, content)
    }

    /// Restores the content archived as `target` under a new version number.
    ///
    /// # Errors
    ///
    /// * `VersionConflict` if the live version moved past `expected`
    /// * `InvalidVersion` / `SameVersion` from rollback planning
    /// * `VersionNotFound` if `target` was never archived
    pub fn rollback(&mut self, expected: i32, target: i32) -> Result<VersionStep, VersioningError> {
        self.check_expected(expected)?;
        let step = VersionService::plan_rollback(self.version, target)?;
        let content = self
            .history
            .get(&target)
            .map(|archived| archived.snapshot.clone())
            .ok_or(VersioningError::VersionNotFound(target))?;
        self.commit(step, content)
    }

    fn check_expected(&self, expected: i32) -> Result<(), VersioningError> {
        if self.version != expected {
            return Err(VersioningError::VersionConflict { expected });
        }
        Ok(())
    }

    /// Archives the live state under `step.superseded`, then overwrites it.
    fn commit(&mut self, step: VersionStep, content: S) -> Result<VersionStep, VersioningError> {
        if self.history.contains_key(&step.superseded) {
            return Err(VersioningError::VersionConflict {
                expected: step.superseded,
            });
        }

        let superseded = std::mem::replace(&mut self.live, content);
        self.history.insert(
            step.superseded,
            ArchivedVersion {
                version: step.superseded,
                snapshot: superseded,
            },
        );
        self.version = step.next;

        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Content {
        name: String,
        description: Option<String>,
    }

    fn content(name: &str, description: Option<&str>) -> Content {
        Content {
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn test_new_ledger_has_no_history() {
        let ledger = VersionLedger::new(content("Road works", None));
        assert_eq!(ledger.version(), 1);
        assert_eq!(ledger.history_len(), 0);
    }

    #[test]
    fn test_edit_archives_pre_edit_state() {
        let mut ledger = VersionLedger::new(content("Road works", None));

        let step = ledger
            .edit(1, |c| Content {
                name: "Road repair".to_string(),
                ..c.clone()
            })
            .unwrap();

        assert_eq!(step.next, 2);
        assert_eq!(ledger.version(), 2);
        assert_eq!(ledger.live().name, "Road repair");
        assert_eq!(ledger.history_len(), 1);
        assert_eq!(ledger.archived(1).unwrap().snapshot, content("Road works", None));
    }

    #[test]
    fn test_noop_edit_still_bumps_version() {
        let mut ledger = VersionLedger::new(content("Road works", None));
        ledger.edit(1, Clone::clone).unwrap();
        assert_eq!(ledger.version(), 2);
        assert_eq!(ledger.history_len(), 1);
    }

    #[test]
    fn test_stale_edit_conflicts() {
        let mut ledger = VersionLedger::new(content("Road works", None));
        ledger.edit(1, Clone::clone).unwrap();

        let before = ledger.clone();
        let err = ledger.edit(1, Clone::clone).unwrap_err();

        assert_eq!(err, VersioningError::VersionConflict { expected: 1 });
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_rollback_missing_version_leaves_ledger_unchanged() {
        let mut ledger = VersionLedger::new(content("Road works", None));
        ledger.edit(1, Clone::clone).unwrap();

        let before = ledger.clone();
        let err = ledger.rollback(2, 7).unwrap_err();

        assert_eq!(err, VersioningError::VersionNotFound(7));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_rollback_to_current_rejected() {
        let mut ledger = VersionLedger::new(content("Road works", None));
        let before = ledger.clone();
        assert_eq!(ledger.rollback(1, 1), Err(VersioningError::SameVersion(1)));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_create_edit_edit_rollback_scenario() {
        let mut ledger = VersionLedger::new(content("Bridge", Some("Steel bridge")));

        ledger
            .edit(1, |c| Content {
                name: "Bridge v2".to_string(),
                ..c.clone()
            })
            .unwrap();
        ledger
            .edit(2, |c| Content {
                description: Some("Concrete bridge".to_string()),
                ..c.clone()
            })
            .unwrap();
        assert_eq!(ledger.version(), 3);
        assert_eq!(ledger.history_len(), 2);

        let step = ledger.rollback(3, 1).unwrap();

        assert_eq!(step.next, 4);
        assert_eq!(ledger.version(), 4);
        assert_eq!(ledger.live(), &content("Bridge", Some("Steel bridge")));
        let archived: Vec<i32> = ledger.history().map(|a| a.version).collect();
        assert_eq!(archived, vec![1, 2, 3]);
        assert_eq!(
            ledger.archived(3).unwrap().snapshot,
            content("Bridge v2", Some("Concrete bridge"))
        );
    }

    #[test]
    fn test_rollback_twice_to_same_target() {
        let mut ledger = VersionLedger::new(content("A", None));
        ledger.edit(1, |_| content("B", None)).unwrap();

        ledger.rollback(2, 1).unwrap();
        assert_eq!(ledger.live(), &content("A", None));

        ledger.rollback(3, 1).unwrap();
        assert_eq!(ledger.live(), &content("A", None));
        assert_eq!(ledger.version(), 4);
        assert_eq!(ledger.history_len(), 3);
    }
}
