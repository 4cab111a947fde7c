//! Bid lifecycle rules: content edits, decisions and feedback.
//!
//! # Modules
//!
//! - `types` - Bid status, author type, decision kind, content and patch
//! - `error` - Bid error kinds
//! - `service` - Validation, patching and the decision/feedback rules

pub mod error;
pub mod service;
pub mod types;

pub use error::BidError;
pub use service::BidService;
pub use types::{AuthorType, BidContent, BidPatch, BidStatus, DecisionKind, NewBid};
