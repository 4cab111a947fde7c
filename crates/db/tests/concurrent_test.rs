//! Concurrent and stale writers against versioned rows.
//!
//! These tests verify that:
//! - a writer holding a superseded version can never overwrite the live row
//! - a writer holding a superseded status can never overwrite the live row
//! - back-to-back edits through the pool never produce the same version twice
//! - a failed overwrite leaves no history row behind
//!
//! The in-memory pool holds a single connection, so writers queue on it and
//! their transactions run one after another.

mod common;

use futures::future::join_all;
use sea_orm::TransactionTrait;

use common::{Fixture, id};
use tenderbid_core::bid::BidStatus;
use tenderbid_core::tender::{TenderError, TenderPatch, TenderStatus};
use tenderbid_core::versioning::VersioningError;
use tenderbid_db::entities::tenders;
use tenderbid_db::repositories::versioning::{self, VersionedRecord};
use tenderbid_shared::types::{BidId, TenderId};

#[tokio::test]
async fn test_stale_writer_gets_version_conflict() {
    let fx = Fixture::new().await;
    let stale = fx.tender("Bridge").await;
    let tender_id = TenderId::from_uuid(stale.id);

    fx.tenders()
        .edit(
            tender_id,
            id(&fx.owner),
            &TenderPatch {
                name: Some("Fresh".to_string()),
                ..TenderPatch::default()
            },
        )
        .await
        .unwrap();

    let txn = fx.db.begin().await.unwrap();
    let mut content = stale.content();
    content.name = "Stale".to_string();
    let err = versioning::edit(&txn, &stale, content).await.unwrap_err();
    drop(txn);

    assert_eq!(err, VersioningError::VersionConflict { expected: 1 });
    let live = fx.tenders().find_by_id(tender_id).await.unwrap().unwrap();
    assert_eq!(live.name, "Fresh");
    assert_eq!(live.version, 2);
    assert_eq!(fx.tenders().history(tender_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_compare_and_swap_skips_moved_row() {
    let fx = Fixture::new().await;
    let tender = fx.tender("Bridge").await;
    let tender_id = TenderId::from_uuid(tender.id);

    fx.tenders()
        .edit(tender_id, id(&fx.owner), &TenderPatch::default())
        .await
        .unwrap();

    let txn = fx.db.begin().await.unwrap();
    let affected = tenders::Model::compare_and_swap(&txn, &tender, &tender.content(), 2)
        .await
        .unwrap();
    txn.commit().await.unwrap();

    assert_eq!(affected, 0);
}

#[tokio::test]
async fn test_tender_status_change_survives_stale_edit() {
    let fx = Fixture::new().await;
    let read = fx.tender("Bridge").await;
    let tender_id = TenderId::from_uuid(read.id);

    fx.tenders()
        .set_status(tender_id, id(&fx.owner), TenderStatus::Published)
        .await
        .unwrap();

    let txn = fx.db.begin().await.unwrap();
    let err = versioning::edit(&txn, &read, read.content()).await.unwrap_err();
    drop(txn);

    assert_eq!(err, VersioningError::VersionConflict { expected: 1 });
    let live = fx.tenders().find_by_id(tender_id).await.unwrap().unwrap();
    assert_eq!(TenderStatus::from(live.status), TenderStatus::Published);
    assert_eq!(live.version, 1);
    assert!(fx.tenders().history(tender_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bid_status_change_survives_stale_edit() {
    let fx = Fixture::new().await;
    let tender = fx.tender("Bridge").await;
    let read = fx.bid(&tender, &fx.bidder, "Offer").await;
    let bid_id = BidId::from_uuid(read.id);

    fx.bids()
        .set_status(bid_id, id(&fx.bidder), BidStatus::Published)
        .await
        .unwrap();

    let txn = fx.db.begin().await.unwrap();
    let err = versioning::edit(&txn, &read, read.content()).await.unwrap_err();
    drop(txn);

    assert_eq!(err, VersioningError::VersionConflict { expected: 1 });
    let live = fx.bids().find_by_id(bid_id).await.unwrap().unwrap();
    assert_eq!(BidStatus::from(live.status), BidStatus::Published);
    assert_eq!(live.version, 1);
    assert!(fx.bids().history(bid_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_status_change_after_edit_keeps_new_version() {
    let fx = Fixture::new().await;
    let tender = fx.tender("Bridge").await;
    let tender_id = TenderId::from_uuid(tender.id);

    fx.tenders()
        .edit(tender_id, id(&fx.owner), &TenderPatch::default())
        .await
        .unwrap();
    let updated = fx
        .tenders()
        .set_status(tender_id, id(&fx.colleague), TenderStatus::Closed)
        .await
        .unwrap();

    assert_eq!(updated.version, 2);
    assert_eq!(TenderStatus::from(updated.status), TenderStatus::Closed);
    assert_eq!(fx.tenders().history(tender_id).await.unwrap().len(), 1);
}

/// Edits issued together still commit one at a time and each gets its own
/// version.
#[tokio::test]
async fn test_queued_edits_get_distinct_versions() {
    let fx = Fixture::new().await;
    let tender = fx.tender("Bridge").await;
    let tender_id = TenderId::from_uuid(tender.id);
    let writers = 10;

    let results: Vec<Result<_, TenderError>> = join_all((0..writers).map(|n| {
        let repo = fx.tenders();
        let caller = if n % 2 == 0 {
            id(&fx.owner)
        } else {
            id(&fx.colleague)
        };
        async move {
            repo.edit(
                tender_id,
                caller,
                &TenderPatch {
                    name: Some(format!("Bridge {n}")),
                    ..TenderPatch::default()
                },
            )
            .await
        }
    }))
    .await;

    let mut versions: Vec<i32> = results
        .into_iter()
        .filter_map(Result::ok)
        .map(|tender| tender.version)
        .collect();
    let committed = versions.len();
    versions.sort_unstable();
    versions.dedup();
    assert_eq!(versions.len(), committed, "two edits produced the same version");

    let live = fx.tenders().find_by_id(tender_id).await.unwrap().unwrap();
    let history: Vec<i32> = fx
        .tenders()
        .history(tender_id)
        .await
        .unwrap()
        .iter()
        .map(|row| row.version)
        .collect();
    assert_eq!(history, (1..live.version).collect::<Vec<_>>());
    assert_eq!(usize::try_from(live.version).unwrap(), committed + 1);
}
