//! Entity re-exports.

pub use super::bid_versions::Entity as BidVersions;
pub use super::bids::Entity as Bids;
pub use super::decisions::Entity as Decisions;
pub use super::employee::Entity as Employee;
pub use super::feedbacks::Entity as Feedbacks;
pub use super::organization::Entity as Organization;
pub use super::organization_responsibles::Entity as OrganizationResponsibles;
pub use super::tender_versions::Entity as TenderVersions;
pub use super::tenders::Entity as Tenders;
