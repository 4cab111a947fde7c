//! Version history for mutable procurement entities.
//!
//! Tenders and bids keep their current state in a live row and every
//! superseded state in an append-only history table. This module holds the
//! rules both entity kinds share:
//!
//! - the superseded version is archived before the live state is overwritten
//! - every edit and every rollback produces `current + 1`
//! - rolling back to the current version is rejected up front
//! - an overwrite only applies if the live version still matches (compare-and-swap)
//!
//! # Modules
//!
//! - `types` - `VersionStep` and the initial version
//! - `error` - Versioning error kinds
//! - `service` - Stateless planning of edit and rollback steps
//!
//! Tests additionally build an in-memory `ledger` on top of `service` and
//! replay random operation sequences against it.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod ledger;
#[cfg(test)]
mod ledger_props;

pub use error::VersioningError;
pub use service::VersionService;
pub use types::{INITIAL_VERSION, VersionStep};
