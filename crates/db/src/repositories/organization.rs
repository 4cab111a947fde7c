//! Organization repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{organization, organization_responsibles, sea_orm_active_enums::OrganizationType};

/// Input for registering an organization.
#[derive(Debug, Clone)]
pub struct NewOrganization {
    /// Display name.
    pub name: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Legal form.
    pub kind: Option<OrganizationType>,
}

/// Organization repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an organization by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<organization::Model>, DbErr> {
        organization::Entity::find_by_id(id).one(&self.db).await
    }

    /// Registers a new organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: NewOrganization) -> Result<organization::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let org = organization::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            kind: Set(input.kind),
            created_at: Set(now),
            updated_at: Set(now),
        };

        org.insert(&self.db).await
    }

    /// Makes an employee responsible for an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails, including when the
    /// employee is already responsible for it.
    pub async fn add_responsible(
        &self,
        org_id: Uuid,
        user_id: Uuid,
    ) -> Result<organization_responsibles::Model, DbErr> {
        let responsible = organization_responsibles::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(org_id),
            user_id: Set(user_id),
        };

        responsible.insert(&self.db).await
    }

    /// Checks if an employee is responsible for an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_responsible(&self, org_id: Uuid, user_id: Uuid) -> Result<bool, DbErr> {
        let count = organization_responsibles::Entity::find()
            .filter(organization_responsibles::Column::OrganizationId.eq(org_id))
            .filter(organization_responsibles::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
