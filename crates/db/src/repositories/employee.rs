//! Employee repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

use tenderbid_core::access::Membership;
use tenderbid_shared::types::{EmployeeId, OrganizationId};

use crate::entities::{employee, organization_responsibles};

/// Input for registering an employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    /// Unique login name.
    pub username: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
}

/// Employee repository for lookups and registration.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Creates a new employee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an employee by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<employee::Model>, DbErr> {
        find_by_username(&self.db, username).await
    }

    /// Finds an employee by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<employee::Model>, DbErr> {
        employee::Entity::find_by_id(id).one(&self.db).await
    }

    /// Registers a new employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails, including a duplicate
    /// username.
    pub async fn create(&self, input: NewEmployee) -> Result<employee::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let employee = employee::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(input.username),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            created_at: Set(now),
            updated_at: Set(now),
        };

        employee.insert(&self.db).await
    }

    /// Loads the employee's organization responsibilities.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn membership(&self, employee_id: EmployeeId) -> Result<Membership, DbErr> {
        load_membership(&self.db, employee_id).await
    }
}

/// Finds an employee by username on any connection.
pub(crate) async fn find_by_username<C: ConnectionTrait>(
    conn: &C,
    username: &str,
) -> Result<Option<employee::Model>, DbErr> {
    employee::Entity::find()
        .filter(employee::Column::Username.eq(username))
        .one(conn)
        .await
}

/// Loads a `Membership` snapshot on any connection, including an open
/// transaction.
pub(crate) async fn load_membership<C: ConnectionTrait>(
    conn: &C,
    employee_id: EmployeeId,
) -> Result<Membership, DbErr> {
    let organizations: Vec<Uuid> = organization_responsibles::Entity::find()
        .select_only()
        .column(organization_responsibles::Column::OrganizationId)
        .filter(organization_responsibles::Column::UserId.eq(employee_id.into_inner()))
        .into_tuple()
        .all(conn)
        .await?;

    Ok(Membership::new(
        employee_id,
        organizations.into_iter().map(OrganizationId::from_uuid).collect(),
    ))
}
