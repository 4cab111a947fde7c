//! Pure authorization predicates.
//!
//! The repositories resolve the caller and their organization
//! responsibilities once, then every rule below is a plain function of that
//! snapshot and the entity being touched.
//!
//! # Modules
//!
//! - `policy` - `Membership` and the predicates built on it

pub mod policy;

pub use policy::{Membership, can_view_tender_status, is_owner, is_responsible_for};
