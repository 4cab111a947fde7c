//! Shared fixtures for the database integration tests.
//!
//! Every test gets its own in-memory SQLite database with the full schema.
//! The pool holds a single connection, so the database lives as long as the
//! pool and concurrent transactions are serialized.

#![allow(dead_code)]

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use tenderbid_core::bid::{AuthorType, NewBid};
use tenderbid_core::tender::{NewTender, ServiceType};
use tenderbid_db::entities::{bids, employee, organization, tenders};
use tenderbid_db::migration::Migrator;
use tenderbid_db::{
    BidRepository, EmployeeRepository, NewEmployee, NewOrganization, OrganizationRepository,
    TenderRepository,
};
use tenderbid_shared::DatabaseConfig;
use tenderbid_shared::types::{EmployeeId, OrganizationId, TenderId};

/// Opens a migrated in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = tenderbid_db::connect(&config).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// An organization with one responsible employee, a second responsible
/// employee, a bidder and an outsider.
pub struct Fixture {
    pub db: DatabaseConnection,
    pub org: organization::Model,
    pub owner: employee::Model,
    pub colleague: employee::Model,
    pub bidder: employee::Model,
    pub outsider: employee::Model,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = setup_db().await;
        let employees = EmployeeRepository::new(db.clone());
        let organizations = OrganizationRepository::new(db.clone());

        let owner = create_employee(&employees, "owner").await;
        let colleague = create_employee(&employees, "colleague").await;
        let bidder = create_employee(&employees, "bidder").await;
        let outsider = create_employee(&employees, "outsider").await;

        let org = organizations
            .create(NewOrganization {
                name: "Roads LLC".to_string(),
                description: None,
                kind: None,
            })
            .await
            .unwrap();
        organizations.add_responsible(org.id, owner.id).await.unwrap();
        organizations
            .add_responsible(org.id, colleague.id)
            .await
            .unwrap();

        Self {
            db,
            org,
            owner,
            colleague,
            bidder,
            outsider,
        }
    }

    pub fn tenders(&self) -> TenderRepository {
        TenderRepository::new(self.db.clone())
    }

    pub fn bids(&self) -> BidRepository {
        BidRepository::new(self.db.clone())
    }

    pub fn org_id(&self) -> OrganizationId {
        OrganizationId::from_uuid(self.org.id)
    }

    /// Creates a tender owned by `owner`.
    pub async fn tender(&self, name: &str) -> tenders::Model {
        self.tenders()
            .create(NewTender {
                name: name.to_string(),
                description: Some(format!("{name} description")),
                service_type: ServiceType::Construction,
                organization_id: self.org_id(),
                created_by: id(&self.owner),
            })
            .await
            .unwrap()
    }

    /// Creates a bid by `author` on `tender`.
    pub async fn bid(
        &self,
        tender: &tenders::Model,
        author: &employee::Model,
        name: &str,
    ) -> bids::Model {
        self.bids()
            .create(NewBid {
                name: name.to_string(),
                description: Some(format!("{name} description")),
                tender_id: TenderId::from_uuid(tender.id),
                author_type: AuthorType::User,
                author_id: id(author),
            })
            .await
            .unwrap()
    }
}

pub fn id(employee: &employee::Model) -> EmployeeId {
    EmployeeId::from_uuid(employee.id)
}

async fn create_employee(repo: &EmployeeRepository, username: &str) -> employee::Model {
    repo.create(NewEmployee {
        username: username.to_string(),
        first_name: Some(username.to_string()),
        last_name: None,
    })
    .await
    .unwrap()
}
