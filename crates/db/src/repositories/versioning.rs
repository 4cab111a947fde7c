//! Transactional archive+overwrite shared by tenders and bids.
//!
//! Every mutation of versioned content runs inside the caller's transaction:
//!
//! 1. the live row is archived under its current version
//! 2. the live row is overwritten with `UPDATE .. WHERE id = ? AND version = ?
//!    AND status = ?`, so a concurrent status change also fails the swap
//! 3. zero affected rows, or a duplicate history row, means another writer
//!    got there first and the whole transaction must be dropped
//!
//! Dropping a `DatabaseTransaction` without committing rolls it back, so an
//! error from any step leaves neither the live row nor the history changed.

use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, DbErr, SqlErr};
use tracing::{debug, warn};
use uuid::Uuid;

use tenderbid_core::versioning::{VersionService, VersionStep, VersioningError};

/// A live row whose content is versioned through a history table.
#[async_trait]
pub trait VersionedRecord: Sized + Send + Sync {
    /// The versioned fields, as archived and restored.
    type Content: Send + Sync;

    /// Primary key of the live row.
    fn id(&self) -> Uuid;

    /// Version currently carried by the live row.
    fn version(&self) -> i32;

    /// Inserts a history row holding this row's content under its current version.
    async fn archive(&self, txn: &DatabaseTransaction) -> Result<(), DbErr>;

    /// Loads the content archived for `version`, if any.
    async fn find_archived(
        txn: &DatabaseTransaction,
        id: Uuid,
        version: i32,
    ) -> Result<Option<Self::Content>, DbErr>;

    /// Overwrites the live row only while it still carries the version and
    /// status read in `current`.
    ///
    /// Returns the number of affected rows.
    async fn compare_and_swap(
        txn: &DatabaseTransaction,
        current: &Self,
        content: &Self::Content,
        next: i32,
    ) -> Result<u64, DbErr>;

    /// Re-reads the live row.
    async fn reload(txn: &DatabaseTransaction, id: Uuid) -> Result<Option<Self>, DbErr>;
}

/// Archives `current` and replaces its content with `content` at `version + 1`.
///
/// # Errors
///
/// * `VersionConflict` if another writer already superseded `current`
/// * `ArchiveFailed` if the history row cannot be written
/// * `Database` for any other database failure
pub async fn edit<R: VersionedRecord>(
    txn: &DatabaseTransaction,
    current: &R,
    content: R::Content,
) -> Result<R, VersioningError> {
    let step = VersionService::plan_edit(current.version())?;
    commit(txn, current, step, &content).await
}

/// Restores the content archived as `target` under `version + 1`.
///
/// # Errors
///
/// * `SameVersion` / `InvalidVersion` before touching the store
/// * `VersionNotFound` if no history row exists for `target`
/// * the errors of [`edit`]
pub async fn rollback<R: VersionedRecord>(
    txn: &DatabaseTransaction,
    current: &R,
    target: i32,
) -> Result<R, VersioningError> {
    let step = VersionService::plan_rollback(current.version(), target)?;

    let content = R::find_archived(txn, current.id(), target)
        .await
        .map_err(database)?
        .ok_or(VersioningError::VersionNotFound(target))?;

    commit(txn, current, step, &content).await
}

/// Writes `current` to history.
///
/// # Errors
///
/// `VersionConflict` when the version is already archived, `ArchiveFailed`
/// otherwise.
pub async fn archive<R: VersionedRecord>(
    txn: &DatabaseTransaction,
    current: &R,
) -> Result<(), VersioningError> {
    current.archive(txn).await.map_err(|e| {
        if is_unique_violation(&e) {
            warn!(id = %current.id(), version = current.version(), "Version already archived");
            VersioningError::VersionConflict {
                expected: current.version(),
            }
        } else {
            VersioningError::ArchiveFailed(e.to_string())
        }
    })
}

async fn commit<R: VersionedRecord>(
    txn: &DatabaseTransaction,
    current: &R,
    step: VersionStep,
    content: &R::Content,
) -> Result<R, VersioningError> {
    archive(txn, current).await?;

    let affected = R::compare_and_swap(txn, current, content, step.next)
        .await
        .map_err(database)?;
    if affected == 0 {
        warn!(id = %current.id(), expected = step.superseded, "Live version moved during overwrite");
        return Err(VersioningError::VersionConflict {
            expected: step.superseded,
        });
    }

    debug!(id = %current.id(), from = step.superseded, to = step.next, "Version committed");

    R::reload(txn, current.id())
        .await
        .map_err(database)?
        .ok_or_else(|| VersioningError::Database(format!("row {} vanished", current.id())))
}

/// Returns true if the error is a unique constraint violation.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn database(err: DbErr) -> VersioningError {
    VersioningError::Database(err.to_string())
}
