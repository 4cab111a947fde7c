//! Initial database migration.
//!
//! Creates the employee and organization directory, tenders and bids with
//! their version history, and the decision and feedback tables. Tables are
//! built with portable schema statements so the same migration runs on
//! `PostgreSQL` and `SQLite`; label constraints are added on `PostgreSQL` only.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: DIRECTORY
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employee::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Employee::Username)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Employee::FirstName).string_len(50))
                    .col(ColumnDef::new(Employee::LastName).string_len(50))
                    .col(timestamp_col(Employee::CreatedAt))
                    .col(timestamp_col(Employee::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Organization::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Organization::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Organization::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Organization::Description).text())
                    .col(ColumnDef::new(Organization::Type).string_len(16))
                    .col(timestamp_col(Organization::CreatedAt))
                    .col(timestamp_col(Organization::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrganizationResponsibles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrganizationResponsibles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OrganizationResponsibles::OrganizationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrganizationResponsibles::UserId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                OrganizationResponsibles::Table,
                                OrganizationResponsibles::OrganizationId,
                            )
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(OrganizationResponsibles::Table, OrganizationResponsibles::UserId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_organization_responsibles_org_user")
                    .table(OrganizationResponsibles::Table)
                    .col(OrganizationResponsibles::OrganizationId)
                    .col(OrganizationResponsibles::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: TENDERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Tenders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tenders::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tenders::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Tenders::Description).text())
                    .col(ColumnDef::new(Tenders::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Tenders::ServiceType).string_len(16).not_null())
                    .col(version_col(Tenders::Version))
                    .col(ColumnDef::new(Tenders::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Tenders::OrganizationId).uuid().not_null())
                    .col(timestamp_col(Tenders::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tenders::Table, Tenders::CreatedBy)
                            .to(Employee::Table, Employee::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tenders::Table, Tenders::OrganizationId)
                            .to(Organization::Table, Organization::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TenderVersions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TenderVersions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TenderVersions::TenderId).uuid().not_null())
                    .col(ColumnDef::new(TenderVersions::Name).string_len(100).not_null())
                    .col(ColumnDef::new(TenderVersions::Description).text())
                    .col(ColumnDef::new(TenderVersions::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(TenderVersions::ServiceType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(version_col(TenderVersions::Version))
                    .col(ColumnDef::new(TenderVersions::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(TenderVersions::OrganizationId).uuid().not_null())
                    .col(timestamp_col(TenderVersions::ArchivedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(TenderVersions::Table, TenderVersions::TenderId)
                            .to(Tenders::Table, Tenders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A version number is archived at most once per tender
        manager
            .create_index(
                Index::create()
                    .name("uq_tender_versions_tender_version")
                    .table(TenderVersions::Table)
                    .col(TenderVersions::TenderId)
                    .col(TenderVersions::Version)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: BIDS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Bids::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bids::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bids::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Bids::Description).text())
                    .col(ColumnDef::new(Bids::TenderId).uuid().not_null())
                    .col(ColumnDef::new(Bids::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Bids::AuthorType).string_len(16).not_null())
                    .col(ColumnDef::new(Bids::AuthorId).uuid().not_null())
                    .col(version_col(Bids::Version))
                    .col(ColumnDef::new(Bids::CreatedBy).uuid().not_null())
                    .col(timestamp_col(Bids::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Bids::Table, Bids::TenderId)
                            .to(Tenders::Table, Tenders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One bid per author per tender
        manager
            .create_index(
                Index::create()
                    .name("uq_bids_tender_author")
                    .table(Bids::Table)
                    .col(Bids::TenderId)
                    .col(Bids::AuthorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BidVersions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BidVersions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BidVersions::BidId).uuid().not_null())
                    .col(ColumnDef::new(BidVersions::Name).string_len(100).not_null())
                    .col(ColumnDef::new(BidVersions::Description).text())
                    .col(ColumnDef::new(BidVersions::Status).string_len(16).not_null())
                    .col(ColumnDef::new(BidVersions::AuthorType).string_len(16).not_null())
                    .col(ColumnDef::new(BidVersions::AuthorId).uuid().not_null())
                    .col(version_col(BidVersions::Version))
                    .col(timestamp_col(BidVersions::ArchivedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(BidVersions::Table, BidVersions::BidId)
                            .to(Bids::Table, Bids::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_bid_versions_bid_version")
                    .table(BidVersions::Table)
                    .col(BidVersions::BidId)
                    .col(BidVersions::Version)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 4: REVIEWS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Decisions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Decisions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Decisions::BidId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Decisions::Decision).string_len(16).not_null())
                    .col(ColumnDef::new(Decisions::CreatedBy).uuid().not_null())
                    .col(timestamp_col(Decisions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Decisions::Table, Decisions::BidId)
                            .to(Bids::Table, Bids::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Decisions::Table, Decisions::CreatedBy)
                            .to(Employee::Table, Employee::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Feedbacks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Feedbacks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Feedbacks::BidId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Feedbacks::Feedback).text().not_null())
                    .col(ColumnDef::new(Feedbacks::CreatedBy).uuid().not_null())
                    .col(timestamp_col(Feedbacks::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Feedbacks::Table, Feedbacks::BidId)
                            .to(Bids::Table, Bids::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Feedbacks::Table, Feedbacks::CreatedBy)
                            .to(Employee::Table, Employee::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 5: LABEL CONSTRAINTS (PostgreSQL)
        // ============================================================
        if manager.get_database_backend() == DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared(LABEL_CONSTRAINTS_SQL)
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedbacks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Decisions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BidVersions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bids::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TenderVersions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenders::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrganizationResponsibles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organization::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employee::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

fn timestamp_col<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn version_col<T: IntoIden + Copy + 'static>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .integer()
        .not_null()
        .default(1)
        .check(Expr::col(name).gte(1))
        .to_owned()
}

const LABEL_CONSTRAINTS_SQL: &str = r"
ALTER TABLE organization ADD CONSTRAINT chk_organization_type
    CHECK (type IN ('IE', 'LLC', 'JSC'));
ALTER TABLE tenders ADD CONSTRAINT chk_tenders_status
    CHECK (status IN ('Created', 'Published', 'Closed'));
ALTER TABLE tenders ADD CONSTRAINT chk_tenders_service_type
    CHECK (service_type IN ('Construction', 'Delivery', 'Manufacture'));
ALTER TABLE tender_versions ADD CONSTRAINT chk_tender_versions_status
    CHECK (status IN ('Created', 'Published', 'Closed'));
ALTER TABLE bids ADD CONSTRAINT chk_bids_status
    CHECK (status IN ('Created', 'Published', 'Canceled'));
ALTER TABLE bids ADD CONSTRAINT chk_bids_author_type
    CHECK (author_type IN ('Organization', 'User'));
ALTER TABLE bid_versions ADD CONSTRAINT chk_bid_versions_status
    CHECK (status IN ('Created', 'Published', 'Canceled'));
ALTER TABLE decisions ADD CONSTRAINT chk_decisions_decision
    CHECK (decision IN ('Approved', 'Rejected'));

CREATE INDEX idx_tenders_service_type ON tenders(service_type);
CREATE INDEX idx_tenders_created_by ON tenders(created_by, name);
CREATE INDEX idx_bids_created_by ON bids(created_by, name);
";

#[derive(DeriveIden, Clone, Copy)]
enum Employee {
    Table,
    Id,
    Username,
    FirstName,
    LastName,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Organization {
    Table,
    Id,
    Name,
    Description,
    Type,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum OrganizationResponsibles {
    Table,
    Id,
    OrganizationId,
    UserId,
}

#[derive(DeriveIden, Clone, Copy)]
enum Tenders {
    Table,
    Id,
    Name,
    Description,
    Status,
    ServiceType,
    Version,
    CreatedBy,
    OrganizationId,
    CreatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum TenderVersions {
    Table,
    Id,
    TenderId,
    Name,
    Description,
    Status,
    ServiceType,
    Version,
    CreatedBy,
    OrganizationId,
    ArchivedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Bids {
    Table,
    Id,
    Name,
    Description,
    TenderId,
    Status,
    AuthorType,
    AuthorId,
    Version,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum BidVersions {
    Table,
    Id,
    BidId,
    Name,
    Description,
    Status,
    AuthorType,
    AuthorId,
    Version,
    ArchivedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Decisions {
    Table,
    Id,
    BidId,
    Decision,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Feedbacks {
    Table,
    Id,
    BidId,
    Feedback,
    CreatedBy,
    CreatedAt,
}
