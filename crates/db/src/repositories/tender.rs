//! Tender repository: lifecycle, status and versioned edits.

use async_trait::async_trait;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use tenderbid_core::access::Membership;
use tenderbid_core::versioning::VersioningError;
use tenderbid_core::tender::{
    NewTender, ServiceType, TenderContent, TenderError, TenderPatch, TenderService, TenderStatus,
};
use tenderbid_shared::types::{EmployeeId, OrganizationId, Page, TenderId};

use crate::entities::{organization, sea_orm_active_enums as db_enums, tender_versions, tenders};

use super::employee::load_membership;
use super::versioning::{self, VersionedRecord};

impl tenders::Model {
    /// Returns the versioned fields of this tender.
    #[must_use]
    pub fn content(&self) -> TenderContent {
        TenderContent {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status.into(),
            service_type: self.service_type.into(),
        }
    }
}

impl From<tender_versions::Model> for TenderContent {
    fn from(row: tender_versions::Model) -> Self {
        Self {
            name: row.name,
            description: row.description,
            status: row.status.into(),
            service_type: row.service_type.into(),
        }
    }
}

#[async_trait]
impl VersionedRecord for tenders::Model {
    type Content = TenderContent;

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i32 {
        self.version
    }

    async fn archive(&self, txn: &DatabaseTransaction) -> Result<(), DbErr> {
        tender_versions::ActiveModel {
            id: Set(Uuid::new_v4()),
            tender_id: Set(self.id),
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            status: Set(self.status),
            service_type: Set(self.service_type),
            version: Set(self.version),
            created_by: Set(self.created_by),
            organization_id: Set(self.organization_id),
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
    ) -> Result<Option<TenderContent>, DbErr> {
        let row = tender_versions::Entity::find()
            .filter(tender_versions::Column::TenderId.eq(id))
            .filter(tender_versions::Column::Version.eq(version))
            .one(txn)
            .await?;

        Ok(row.map(TenderContent::from))
    }

    async fn compare_and_swap(
        txn: &DatabaseTransaction,
        current: &Self,
        content: &TenderContent,
        next: i32,
    ) -> Result<u64, DbErr> {
        let result = tenders::Entity::update_many()
            .set(tenders::ActiveModel {
                name: Set(content.name.clone()),
                description: Set(content.description.clone()),
                status: Set(content.status.into()),
                service_type: Set(content.service_type.into()),
                version: Set(next),
                ..Default::default()
            })
            .filter(tenders::Column::Id.eq(current.id))
            .filter(tenders::Column::Version.eq(current.version))
            .filter(tenders::Column::Status.eq(current.status))
            .exec(txn)
            .await?;

        Ok(result.rows_affected)
    }

    async fn reload(txn: &DatabaseTransaction, id: Uuid) -> Result<Option<Self>, DbErr> {
        tenders::Entity::find_by_id(id).one(txn).await
    }
}

/// Tender repository.
#[derive(Debug, Clone)]
pub struct TenderRepository {
    db: DatabaseConnection,
}

impl TenderRepository {
    /// Creates a new tender repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a tender at version 1. Nothing is archived yet.
    ///
    /// # Errors
    ///
    /// * `OrganizationNotFound` if the organization does not exist
    /// * `NotResponsible` if the creator is not responsible for it
    /// * `Validation` for invalid fields
    pub async fn create(&self, input: NewTender) -> Result<tenders::Model, TenderError> {
        let content = TenderService::validate_new(&input)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        organization::Entity::find_by_id(input.organization_id.into_inner())
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(TenderError::OrganizationNotFound(input.organization_id))?;

        let caller = load_membership(&txn, input.created_by)
            .await
            .map_err(db_err)?;
        TenderService::ensure_responsible(&caller, input.organization_id)?;

        let tender = tenders::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(content.name),
            description: Set(content.description),
            status: Set(content.status.into()),
            service_type: Set(content.service_type.into()),
            version: Set(tenderbid_core::versioning::INITIAL_VERSION),
            created_by: Set(input.created_by.into_inner()),
            organization_id: Set(input.organization_id.into_inner()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(tender_id = %tender.id, organization_id = %tender.organization_id, "Tender created");
        Ok(tender)
    }

    /// Finds a tender by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: TenderId) -> Result<Option<tenders::Model>, TenderError> {
        tenders::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Lists tenders ordered by name, optionally restricted to service types.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        service_types: &[ServiceType],
        page: Page,
    ) -> Result<Vec<tenders::Model>, TenderError> {
        let mut query = tenders::Entity::find();
        if !service_types.is_empty() {
            let labels = service_types
                .iter()
                .map(|kind| db_enums::ServiceType::from(*kind).to_value());
            query = query.filter(tenders::Column::ServiceType.is_in(labels));
        }

        query
            .order_by_asc(tenders::Column::Name)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Lists tenders created by an employee, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_creator(
        &self,
        employee_id: EmployeeId,
        page: Page,
    ) -> Result<Vec<tenders::Model>, TenderError> {
        tenders::Entity::find()
            .filter(tenders::Column::CreatedBy.eq(employee_id.into_inner()))
            .order_by_asc(tenders::Column::Name)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Returns a tender's status if the caller may see it.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the tender does not exist
    /// * `StatusHidden` if it is unpublished and the caller is not its creator
    pub async fn status(
        &self,
        id: TenderId,
        employee_id: EmployeeId,
    ) -> Result<TenderStatus, TenderError> {
        let tender = self.find_by_id(id).await?.ok_or(TenderError::NotFound(id))?;
        let status = TenderStatus::from(tender.status);

        let caller = Membership::employee(employee_id);
        TenderService::ensure_status_visible(
            &caller,
            status,
            EmployeeId::from_uuid(tender.created_by),
        )?;

        Ok(status)
    }

    /// Sets a tender's status label. The version is left unchanged, but the
    /// write only lands while the version read under authorization is still
    /// live, so it cannot be lost to a concurrent edit or rollback.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the tender does not exist
    /// * `NotResponsible` if the caller is not responsible for its organization
    /// * `Versioning(VersionConflict)` if the version moved after it was read
    pub async fn set_status(
        &self,
        id: TenderId,
        employee_id: EmployeeId,
        status: TenderStatus,
    ) -> Result<tenders::Model, TenderError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let tender = authorize(&txn, id, employee_id).await?;

        let affected = tenders::Entity::update_many()
            .set(tenders::ActiveModel {
                status: Set(status.into()),
                ..Default::default()
            })
            .filter(tenders::Column::Id.eq(tender.id))
            .filter(tenders::Column::Version.eq(tender.version))
            .exec(&txn)
            .await
            .map_err(db_err)?
            .rows_affected;
        if affected == 0 {
            warn!(
                tender_id = %id,
                expected = tender.version,
                "Tender version moved during status change"
            );
            return Err(VersioningError::VersionConflict {
                expected: tender.version,
            }
            .into());
        }

        let updated = tenders::Entity::find_by_id(tender.id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(TenderError::NotFound(id))?;

        txn.commit().await.map_err(db_err)?;

        info!(tender_id = %id, status = %status, "Tender status changed");
        Ok(updated)
    }

    /// Edits a tender's content, archiving the superseded version first.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the tender does not exist
    /// * `NotResponsible` if the caller is not responsible for its organization
    /// * `Validation` for invalid fields
    /// * `Versioning(ArchiveFailed | VersionConflict)` if the overwrite fails
    pub async fn edit(
        &self,
        id: TenderId,
        employee_id: EmployeeId,
        patch: &TenderPatch,
    ) -> Result<tenders::Model, TenderError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let tender = authorize(&txn, id, employee_id).await?;

        let content = TenderService::apply_patch(&tender.content(), patch)?;
        let updated = versioning::edit(&txn, &tender, content).await?;

        txn.commit().await.map_err(db_err)?;

        info!(tender_id = %id, version = updated.version, "Tender edited");
        Ok(updated)
    }

    /// Restores an archived version of a tender as a new version.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the tender does not exist
    /// * `NotResponsible` if the caller is not responsible for its organization
    /// * `Versioning(SameVersion)` if `target` is the live version
    /// * `Versioning(VersionNotFound)` if `target` was never archived
    /// * `Versioning(ArchiveFailed | VersionConflict)` if the overwrite fails
    pub async fn rollback(
        &self,
        id: TenderId,
        employee_id: EmployeeId,
        target: i32,
    ) -> Result<tenders::Model, TenderError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let tender = authorize(&txn, id, employee_id).await?;

        let updated = versioning::rollback(&txn, &tender, target).await?;

        txn.commit().await.map_err(db_err)?;

        info!(tender_id = %id, target, version = updated.version, "Tender rolled back");
        Ok(updated)
    }

    /// Returns the archived versions of a tender, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history(&self, id: TenderId) -> Result<Vec<tender_versions::Model>, TenderError> {
        tender_versions::Entity::find()
            .filter(tender_versions::Column::TenderId.eq(id.into_inner()))
            .order_by_asc(tender_versions::Column::Version)
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}

/// Loads the tender and checks the caller's responsibility inside `txn`.
async fn authorize(
    txn: &DatabaseTransaction,
    id: TenderId,
    employee_id: EmployeeId,
) -> Result<tenders::Model, TenderError> {
    let tender = tenders::Entity::find_by_id(id.into_inner())
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(TenderError::NotFound(id))?;

    let caller = load_membership(txn, employee_id).await.map_err(db_err)?;
    TenderService::ensure_responsible(&caller, OrganizationId::from_uuid(tender.organization_id))?;

    Ok(tender)
}

#[allow(clippy::needless_pass_by_value)]
fn db_err(e: DbErr) -> TenderError {
    TenderError::Database(e.to_string())
}
