//! `SeaORM` Entity for tender_versions table.
//!
//! Append-only: rows are inserted when a tender is edited or rolled back and
//! never updated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ServiceType, TenderStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tender_versions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tender_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub status: TenderStatus,
    pub service_type: ServiceType,
    pub version: i32,
    pub created_by: Uuid,
    pub organization_id: Uuid,
    pub archived_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenders::Entity",
        from = "Column::TenderId",
        to = "super::tenders::Column::Id",
        on_delete = "Cascade"
    )]
    Tenders,
}

impl Related<super::tenders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
