//! `SeaORM` entity definitions.

#![allow(missing_docs)]

pub mod prelude;

pub mod bid_versions;
pub mod bids;
pub mod decisions;
pub mod employee;
pub mod feedbacks;
pub mod organization;
pub mod organization_responsibles;
pub mod sea_orm_active_enums;
pub mod tender_versions;
pub mod tenders;
