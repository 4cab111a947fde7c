//! Tender lifecycle rules.
//!
//! # Modules
//!
//! - `types` - Tender status, service type, content and patch types
//! - `error` - Tender error kinds
//! - `service` - Content validation, patching and access rules

pub mod error;
pub mod service;
pub mod types;

pub use error::TenderError;
pub use service::TenderService;
pub use types::{NewTender, ServiceType, TenderContent, TenderPatch, TenderStatus};
