//! Version planning for edits and rollbacks.
//!
//! Stateless: callers pass the live version they read and receive the
//! `VersionStep` to archive and write. Persistence happens elsewhere.

use crate::versioning::error::VersioningError;
use crate::versioning::types::{INITIAL_VERSION, VersionStep};

/// Stateless service planning version transitions.
pub struct VersionService;

impl VersionService {
    /// Plans a content edit of an entity currently at `current`.
    ///
    /// Every edit advances the version by exactly one, whether or not any
    /// field actually changed.
    ///
    /// # Errors
    ///
    /// * `InvalidVersion` if `current` is below the initial version
    /// * `VersionOverflow` if the counter cannot be advanced
    pub fn plan_edit(current: i32) -> Result<VersionStep, VersioningError> {
        Self::validate_version(current)?;
        let next = current
            .checked_add(1)
            .ok_or(VersioningError::VersionOverflow(current))?;

        Ok(VersionStep {
            superseded: current,
            next,
        })
    }

    /// Plans a rollback from `current` to the archived `target`.
    ///
    /// Rollback is forward-only: restored content gets `current + 1`, never
    /// the target's old number. Whether `target` exists in history is the
    /// store's concern.
    ///
    /// # Errors
    ///
    /// * `InvalidVersion` if `target` is below the initial version
    /// * `SameVersion` if `target` is the live version
    /// * `VersionOverflow` if the counter cannot be advanced
    pub fn plan_rollback(current: i32, target: i32) -> Result<VersionStep, VersioningError> {
        Self::validate_version(target)?;
        Self::ensure_not_current(current, target)?;
        Self::plan_edit(current)
    }

    /// Rejects a rollback whose target is the live version.
    ///
    /// Shared by tenders and bids so both reject the no-op identically.
    pub fn ensure_not_current(current: i32, target: i32) -> Result<(), VersioningError> {
        if current == target {
            return Err(VersioningError::SameVersion(target));
        }
        Ok(())
    }

    /// Checks that a version number is in range.
    pub fn validate_version(version: i32) -> Result<(), VersioningError> {
        if version < INITIAL_VERSION {
            return Err(VersioningError::InvalidVersion(version));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_edit_advances_by_one() {
        let step = VersionService::plan_edit(1).unwrap();
        assert_eq!(
            step,
            VersionStep {
                superseded: 1,
                next: 2
            }
        );
    }

    #[test]
    fn test_plan_edit_rejects_zero() {
        assert_eq!(
            VersionService::plan_edit(0),
            Err(VersioningError::InvalidVersion(0))
        );
    }

    #[test]
    fn test_plan_edit_overflow() {
        assert_eq!(
            VersionService::plan_edit(i32::MAX),
            Err(VersioningError::VersionOverflow(i32::MAX))
        );
    }

    #[test]
    fn test_plan_rollback_is_forward_only() {
        let step = VersionService::plan_rollback(3, 1).unwrap();
        assert_eq!(step.superseded, 3);
        assert_eq!(step.next, 4);
    }

    #[test]
    fn test_plan_rollback_to_current_fails() {
        assert_eq!(
            VersionService::plan_rollback(3, 3),
            Err(VersioningError::SameVersion(3))
        );
    }

    #[test]
    fn test_plan_rollback_invalid_target() {
        assert_eq!(
            VersionService::plan_rollback(3, 0),
            Err(VersioningError::InvalidVersion(0))
        );
        assert_eq!(
            VersionService::plan_rollback(3, -7),
            Err(VersioningError::InvalidVersion(-7))
        );
    }

    #[test]
    fn test_plan_rollback_to_future_version_is_planned() {
        // Existence is checked against history by the store, not here.
        let step = VersionService::plan_rollback(2, 9).unwrap();
        assert_eq!(step.next, 3);
    }
}
