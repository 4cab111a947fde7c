//! `SeaORM` Entity for bids table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AuthorType, BidStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bids")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub tender_id: Uuid,
    pub status: BidStatus,
    pub author_type: AuthorType,
    pub author_id: Uuid,
    pub version: i32,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenders::Entity",
        from = "Column::TenderId",
        to = "super::tenders::Column::Id"
    )]
    Tenders,
    #[sea_orm(has_many = "super::bid_versions::Entity")]
    BidVersions,
    #[sea_orm(has_one = "super::decisions::Entity")]
    Decisions,
    #[sea_orm(has_one = "super::feedbacks::Entity")]
    Feedbacks,
}

impl Related<super::tenders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenders.def()
    }
}

impl Related<super::bid_versions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BidVersions.def()
    }
}

impl Related<super::decisions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Decisions.def()
    }
}

impl Related<super::feedbacks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedbacks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
