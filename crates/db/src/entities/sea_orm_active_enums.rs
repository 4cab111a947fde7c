//! String-backed enums shared by the entities, with conversions to the
//! core domain types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tenderbid_core::bid::{AuthorType as CoreAuthorType, BidStatus as CoreBidStatus, DecisionKind};
use tenderbid_core::tender::{ServiceType as CoreServiceType, TenderStatus as CoreTenderStatus};

/// Implements `From` both ways between a database enum and its core twin.
macro_rules! mirror_enum {
    ($db:ident <=> $core:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant),+
                }
            }
        }

        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant),+
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TenderStatus {
    #[sea_orm(string_value = "Created")]
    Created,
    #[sea_orm(string_value = "Published")]
    Published,
    #[sea_orm(string_value = "Closed")]
    Closed,
}

mirror_enum!(TenderStatus <=> CoreTenderStatus { Created, Published, Closed });

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ServiceType {
    #[sea_orm(string_value = "Construction")]
    Construction,
    #[sea_orm(string_value = "Delivery")]
    Delivery,
    #[sea_orm(string_value = "Manufacture")]
    Manufacture,
}

mirror_enum!(ServiceType <=> CoreServiceType { Construction, Delivery, Manufacture });

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum BidStatus {
    #[sea_orm(string_value = "Created")]
    Created,
    #[sea_orm(string_value = "Published")]
    Published,
    #[sea_orm(string_value = "Canceled")]
    Canceled,
}

mirror_enum!(BidStatus <=> CoreBidStatus { Created, Published, Canceled });

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AuthorType {
    #[sea_orm(string_value = "Organization")]
    Organization,
    #[sea_orm(string_value = "User")]
    User,
}

mirror_enum!(AuthorType <=> CoreAuthorType { Organization, User });

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Decision {
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
}

mirror_enum!(Decision <=> DecisionKind { Approved, Rejected });

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum OrganizationType {
    #[sea_orm(string_value = "IE")]
    Ie,
    #[sea_orm(string_value = "LLC")]
    Llc,
    #[sea_orm(string_value = "JSC")]
    Jsc,
}
