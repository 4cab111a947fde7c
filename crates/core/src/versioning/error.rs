//! Versioning error types.

use thiserror::Error;

/// Errors raised while archiving or restoring entity versions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersioningError {
    /// No history row exists for the requested version.
    #[error("Version {0} not found")]
    VersionNotFound(i32),

    /// Rollback target equals the live version.
    #[error("Cannot roll back to the current version {0}")]
    SameVersion(i32),

    /// Version numbers start at 1.
    #[error("Invalid version number {0}")]
    InvalidVersion(i32),

    /// The live row no longer carries the version the mutation was planned against.
    #[error("Version conflict: expected live version {expected}")]
    VersionConflict {
        /// Version the caller read before mutating.
        expected: i32,
    },

    /// The version counter cannot be advanced any further.
    #[error("Version counter exhausted at {0}")]
    VersionOverflow(i32),

    /// Writing the superseded state to history failed.
    #[error("Failed to archive version: {0}")]
    ArchiveFailed(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl VersioningError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidVersion(_) => 400,
            Self::VersionNotFound(_) => 404,
            Self::SameVersion(_) | Self::VersionConflict { .. } => 409,
            Self::VersionOverflow(_) => 422,
            Self::ArchiveFailed(_) | Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::VersionNotFound(_) => "VERSION_NOT_FOUND",
            Self::SameVersion(_) => "SAME_VERSION",
            Self::InvalidVersion(_) => "INVALID_VERSION",
            Self::VersionConflict { .. } => "VERSION_CONFLICT",
            Self::VersionOverflow(_) => "VERSION_OVERFLOW",
            Self::ArchiveFailed(_) => "ARCHIVE_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
