//! Bid repository: lifecycle, reviews and versioned edits.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use tenderbid_core::access::{self, Membership};
use tenderbid_core::bid::{
    BidContent, BidError, BidPatch, BidService, BidStatus, DecisionKind, NewBid,
};
use tenderbid_core::versioning::VersioningError;
use tenderbid_shared::types::{BidId, EmployeeId, OrganizationId, Page, TenderId};

use crate::entities::{bid_versions, bids, decisions, employee, feedbacks, tenders};

use super::employee::{find_by_username, load_membership};
use super::versioning::{self, VersionedRecord, is_unique_violation};

impl bids::Model {
    /// Returns the versioned fields of this bid.
    #[must_use]
    pub fn content(&self) -> BidContent {
        BidContent {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status.into(),
            author_type: self.author_type.into(),
            author_id: EmployeeId::from_uuid(self.author_id),
        }
    }
}

impl From<bid_versions::Model> for BidContent {
    fn from(row: bid_versions::Model) -> Self {
        Self {
            name: row.name,
            description: row.description,
            status: row.status.into(),
            author_type: row.author_type.into(),
            author_id: EmployeeId::from_uuid(row.author_id),
        }
    }
}

#[async_trait]
impl VersionedRecord for bids::Model {
    type Content = BidContent;

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i32 {
        self.version
    }

    async fn archive(&self, txn: &DatabaseTransaction) -> Result<(), DbErr> {
        bid_versions::ActiveModel {
            id: Set(Uuid::new_v4()),
            bid_id: Set(self.id),
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            status: Set(self.status),
            author_type: Set(self.author_type),
            author_id: Set(self.author_id),
            version: Set(self.version),
            archived_at: Set(chrono::Utc::now().into()),
        }
        .insert(txn)
        .await
        .map(|_| ())
    }

    async fn find_archived(
        txn: &DatabaseTransaction,
        id: Uuid,
        version: i32,
    ) -> Result<Option<BidContent>, DbErr> {
        let row = bid_versions::Entity::find()
            .filter(bid_versions::Column::BidId.eq(id))
            .filter(bid_versions::Column::Version.eq(version))
            .one(txn)
            .await?;

        Ok(row.map(BidContent::from))
    }

    async fn compare_and_swap(
        txn: &DatabaseTransaction,
        current: &Self,
        content: &BidContent,
        next: i32,
    ) -> Result<u64, DbErr> {
        let result = bids::Entity::update_many()
            .set(bids::ActiveModel {
                name: Set(content.name.clone()),
                description: Set(content.description.clone()),
                status: Set(content.status.into()),
                author_type: Set(content.author_type.into()),
                author_id: Set(content.author_id.into_inner()),
                version: Set(next),
                ..Default::default()
            })
            .filter(bids::Column::Id.eq(current.id))
            .filter(bids::Column::Version.eq(current.version))
            .filter(bids::Column::Status.eq(current.status))
            .exec(txn)
            .await?;

        Ok(result.rows_affected)
    }

    async fn reload(txn: &DatabaseTransaction, id: Uuid) -> Result<Option<Self>, DbErr> {
        bids::Entity::find_by_id(id).one(txn).await
    }
}

/// Bid repository.
#[derive(Debug, Clone)]
pub struct BidRepository {
    db: DatabaseConnection,
}

impl BidRepository {
    /// Creates a new bid repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Places a bid at version 1. The author is recorded as its creator.
    ///
    /// # Errors
    ///
    /// * `TenderNotFound` if the tender does not exist
    /// * `UnknownAuthor` if the author is not an employee
    /// * `OwnTender` if the author created the tender
    /// * `DuplicateBid` if the author already bid on the tender
    pub async fn create(&self, input: NewBid) -> Result<bids::Model, BidError> {
        let content = BidService::validate_new(&input)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let tender = find_tender(&txn, input.tender_id).await?;

        employee::Entity::find_by_id(input.author_id.into_inner())
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| BidError::UnknownAuthor(input.author_id.to_string()))?;

        let already_bid = bids::Entity::find()
            .filter(bids::Column::TenderId.eq(tender.id))
            .filter(bids::Column::AuthorId.eq(input.author_id.into_inner()))
            .count(&txn)
            .await
            .map_err(db_err)?
            > 0;
        BidService::check_new_bid(
            input.author_id,
            EmployeeId::from_uuid(tender.created_by),
            already_bid,
        )?;

        let bid = bids::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(content.name),
            description: Set(content.description),
            tender_id: Set(tender.id),
            status: Set(content.status.into()),
            author_type: Set(content.author_type.into()),
            author_id: Set(content.author_id.into_inner()),
            version: Set(tenderbid_core::versioning::INITIAL_VERSION),
            created_by: Set(input.author_id.into_inner()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                BidError::DuplicateBid
            } else {
                db_err(e)
            }
        })?;

        txn.commit().await.map_err(db_err)?;

        info!(bid_id = %bid.id, tender_id = %bid.tender_id, "Bid created");
        Ok(bid)
    }

    /// Finds a bid by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: BidId) -> Result<Option<bids::Model>, BidError> {
        bids::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Lists bids created by an employee, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_creator(
        &self,
        employee_id: EmployeeId,
        page: Page,
    ) -> Result<Vec<bids::Model>, BidError> {
        bids::Entity::find()
            .filter(bids::Column::CreatedBy.eq(employee_id.into_inner()))
            .order_by_asc(bids::Column::Name)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Lists the bids on a tender for an employee responsible for its organization.
    ///
    /// # Errors
    ///
    /// * `TenderNotFound` if the tender does not exist
    /// * `NotResponsible` if the caller is not responsible for its organization
    pub async fn list_for_tender(
        &self,
        tender_id: TenderId,
        employee_id: EmployeeId,
        page: Page,
    ) -> Result<Vec<bids::Model>, BidError> {
        let tender = find_tender(&self.db, tender_id).await?;
        let caller = load_membership(&self.db, employee_id)
            .await
            .map_err(db_err)?;

        let organization = OrganizationId::from_uuid(tender.organization_id);
        if !access::is_responsible_for(&caller, organization) {
            return Err(BidError::NotResponsible(organization));
        }

        bids::Entity::find()
            .filter(bids::Column::TenderId.eq(tender.id))
            .order_by_asc(bids::Column::Name)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Returns a bid's status to its creator.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the bid does not exist
    /// * `NotCreator` if the caller did not create it
    pub async fn status(&self, id: BidId, employee_id: EmployeeId) -> Result<BidStatus, BidError> {
        let bid = self.find_by_id(id).await?.ok_or(BidError::NotFound(id))?;
        BidService::ensure_creator(
            &Membership::employee(employee_id),
            EmployeeId::from_uuid(bid.created_by),
        )?;
        Ok(bid.status.into())
    }

    /// Sets a bid's status label. The version is left unchanged, but the
    /// write only lands while the version read under authorization is still
    /// live, so it cannot be lost to a concurrent edit or rollback.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the bid does not exist
    /// * `NotCreator` if the caller did not create it
    /// * `Versioning(VersionConflict)` if the version moved after it was read
    pub async fn set_status(
        &self,
        id: BidId,
        employee_id: EmployeeId,
        status: BidStatus,
    ) -> Result<bids::Model, BidError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let bid = authorize_creator(&txn, id, employee_id).await?;

        let affected = bids::Entity::update_many()
            .set(bids::ActiveModel {
                status: Set(status.into()),
                ..Default::default()
            })
            .filter(bids::Column::Id.eq(bid.id))
            .filter(bids::Column::Version.eq(bid.version))
            .exec(&txn)
            .await
            .map_err(db_err)?
            .rows_affected;
        if affected == 0 {
            warn!(
                bid_id = %id,
                expected = bid.version,
                "Bid version moved during status change"
            );
            return Err(VersioningError::VersionConflict {
                expected: bid.version,
            }
            .into());
        }

        let updated = bids::Entity::find_by_id(bid.id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(BidError::NotFound(id))?;

        txn.commit().await.map_err(db_err)?;

        info!(bid_id = %id, status = %status, "Bid status changed");
        Ok(updated)
    }

    /// Edits a bid's content, archiving the superseded version first.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the bid does not exist
    /// * `NotCreator` if the caller did not create it
    /// * `Validation` for invalid fields
    /// * `Versioning(ArchiveFailed | VersionConflict)` if the overwrite fails
    pub async fn edit(
        &self,
        id: BidId,
        employee_id: EmployeeId,
        patch: &BidPatch,
    ) -> Result<bids::Model, BidError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let bid = authorize_creator(&txn, id, employee_id).await?;

        let content = BidService::apply_patch(&bid.content(), patch)?;
        let updated = versioning::edit(&txn, &bid, content).await?;

        txn.commit().await.map_err(db_err)?;

        info!(bid_id = %id, version = updated.version, "Bid edited");
        Ok(updated)
    }

    /// Restores an archived version of a bid as a new version.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the bid does not exist
    /// * `NotCreator` if the caller did not create it
    /// * `Versioning(SameVersion)` if `target` is the live version
    /// * `Versioning(VersionNotFound)` if `target` was never archived
    /// * `Versioning(ArchiveFailed | VersionConflict)` if the overwrite fails
    pub async fn rollback(
        &self,
        id: BidId,
        employee_id: EmployeeId,
        target: i32,
    ) -> Result<bids::Model, BidError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let bid = authorize_creator(&txn, id, employee_id).await?;

        let updated = versioning::rollback(&txn, &bid, target).await?;

        txn.commit().await.map_err(db_err)?;

        info!(bid_id = %id, target, version = updated.version, "Bid rolled back");
        Ok(updated)
    }

    /// Records the single decision on a bid.
    ///
    /// # Errors
    ///
    /// * `NotFound` / `TenderNotFound` if the bid or its tender is missing
    /// * `SelfDecision` if the reviewer created the bid
    /// * `NotResponsible` if the reviewer is not responsible for the tender's organization
    /// * `DecisionExists` if a decision was already recorded
    /// * `NotDecidable` if the bid is a draft or withdrawn
    pub async fn submit_decision(
        &self,
        id: BidId,
        employee_id: EmployeeId,
        decision: DecisionKind,
    ) -> Result<bids::Model, BidError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let bid = find_bid(&txn, id).await?;
        let tender = find_tender(&txn, TenderId::from_uuid(bid.tender_id)).await?;
        let reviewer = load_membership(&txn, employee_id).await.map_err(db_err)?;

        let already_decided = decisions::Entity::find()
            .filter(decisions::Column::BidId.eq(bid.id))
            .count(&txn)
            .await
            .map_err(db_err)?
            > 0;

        BidService::check_decision(
            &reviewer,
            EmployeeId::from_uuid(bid.created_by),
            OrganizationId::from_uuid(tender.organization_id),
            already_decided,
            bid.status.into(),
        )?;

        decisions::ActiveModel {
            id: Set(Uuid::new_v4()),
            bid_id: Set(bid.id),
            decision: Set(decision.into()),
            created_by: Set(employee_id.into_inner()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                BidError::DecisionExists
            } else {
                db_err(e)
            }
        })?;

        txn.commit().await.map_err(db_err)?;

        info!(bid_id = %id, decision = %decision, "Decision submitted");
        Ok(bid)
    }

    /// Records the single feedback on a bid.
    ///
    /// # Errors
    ///
    /// * `NotFound` / `TenderNotFound` if the bid or its tender is missing
    /// * `NotTenderCreator` if the caller did not create the tender
    /// * `FeedbackExists` if feedback was already recorded
    pub async fn submit_feedback(
        &self,
        id: BidId,
        employee_id: EmployeeId,
        text: &str,
    ) -> Result<bids::Model, BidError> {
        let text = BidService::normalize_feedback(text)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let bid = find_bid(&txn, id).await?;
        let tender = find_tender(&txn, TenderId::from_uuid(bid.tender_id)).await?;

        let already_reviewed = feedbacks::Entity::find()
            .filter(feedbacks::Column::BidId.eq(bid.id))
            .count(&txn)
            .await
            .map_err(db_err)?
            > 0;

        BidService::check_feedback(
            &Membership::employee(employee_id),
            EmployeeId::from_uuid(tender.created_by),
            already_reviewed,
        )?;

        feedbacks::ActiveModel {
            id: Set(Uuid::new_v4()),
            bid_id: Set(bid.id),
            feedback: Set(text),
            created_by: Set(employee_id.into_inner()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                BidError::FeedbackExists
            } else {
                db_err(e)
            }
        })?;

        txn.commit().await.map_err(db_err)?;

        info!(bid_id = %id, "Feedback submitted");
        Ok(bid)
    }

    /// Lists feedback left on an author's bids for a tender.
    ///
    /// # Errors
    ///
    /// * `UnknownAuthor` if no employee has `author_username`
    /// * `TenderNotFound` if the tender does not exist
    /// * `SelfReview` if the requester is the author
    /// * `NotResponsible` if the requester is not responsible for the tender's organization
    /// * `NoBids` if the author has no bids on the tender
    /// * `NoFeedback` if none of those bids has feedback
    pub async fn reviews(
        &self,
        tender_id: TenderId,
        author_username: &str,
        requester_id: EmployeeId,
        page: Page,
    ) -> Result<Vec<feedbacks::Model>, BidError> {
        let author = find_by_username(&self.db, author_username)
            .await
            .map_err(db_err)?
            .ok_or_else(|| BidError::UnknownAuthor(author_username.to_string()))?;
        let tender = find_tender(&self.db, tender_id).await?;
        let requester = load_membership(&self.db, requester_id)
            .await
            .map_err(db_err)?;

        BidService::check_reviews_access(
            &requester,
            EmployeeId::from_uuid(author.id),
            OrganizationId::from_uuid(tender.organization_id),
        )?;

        let bid_ids: Vec<Uuid> = bids::Entity::find()
            .select_only()
            .column(bids::Column::Id)
            .filter(bids::Column::TenderId.eq(tender.id))
            .filter(bids::Column::CreatedBy.eq(author.id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        if bid_ids.is_empty() {
            return Err(BidError::NoBids);
        }

        let reviews = feedbacks::Entity::find()
            .filter(feedbacks::Column::BidId.is_in(bid_ids))
            .order_by_asc(feedbacks::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        if reviews.is_empty() {
            return Err(BidError::NoFeedback);
        }

        Ok(reviews)
    }

    /// Returns the recorded decision on a bid, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn decision(&self, id: BidId) -> Result<Option<decisions::Model>, BidError> {
        decisions::Entity::find()
            .filter(decisions::Column::BidId.eq(id.into_inner()))
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Returns the archived versions of a bid, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history(&self, id: BidId) -> Result<Vec<bid_versions::Model>, BidError> {
        bid_versions::Entity::find()
            .filter(bid_versions::Column::BidId.eq(id.into_inner()))
            .order_by_asc(bid_versions::Column::Version)
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}

async fn find_bid<C: ConnectionTrait>(conn: &C, id: BidId) -> Result<bids::Model, BidError> {
    bids::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or(BidError::NotFound(id))
}

async fn find_tender<C: ConnectionTrait>(
    conn: &C,
    id: TenderId,
) -> Result<tenders::Model, BidError> {
    tenders::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or(BidError::TenderNotFound(id))
}

/// Loads the bid and checks that the caller created it, inside `txn`.
async fn authorize_creator(
    txn: &DatabaseTransaction,
    id: BidId,
    employee_id: EmployeeId,
) -> Result<bids::Model, BidError> {
    let bid = find_bid(txn, id).await?;
    BidService::ensure_creator(
        &Membership::employee(employee_id),
        EmployeeId::from_uuid(bid.created_by),
    )?;
    Ok(bid)
}

#[allow(clippy::needless_pass_by_value)]
fn db_err(e: DbErr) -> BidError {
    BidError::Database(e.to_string())
}
