//! Core procurement rules for Tenderbid.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and access predicates live here.
//!
//! # Modules
//!
//! - `versioning` - Archive-before-overwrite version bookkeeping and rollback planning
//! - `tender` - Tender content, status labels, and edit rules
//! - `bid` - Bid content, decisions, feedback, and edit rules
//! - `access` - Pure authorization predicates
//! - `validation` - Field normalization shared by tenders and bids

pub mod access;
pub mod bid;
mod labels;
pub mod tender;
pub mod validation;
pub mod versioning;
