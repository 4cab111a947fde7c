//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod bid;
pub mod employee;
pub mod organization;
pub mod tender;
pub mod versioning;

pub use bid::BidRepository;
pub use employee::{EmployeeRepository, NewEmployee};
pub use organization::{NewOrganization, OrganizationRepository};
pub use tender::TenderRepository;
pub use versioning::VersionedRecord;
