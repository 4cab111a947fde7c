//! Shared types, errors, and configuration for Tenderbid.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Limit/offset pagination for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, ServerConfig};
pub use error::{AppError, AppResult};
