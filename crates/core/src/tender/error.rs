//! Tender error types.

use thiserror::Error;

use tenderbid_shared::types::{OrganizationId, TenderId};

use crate::validation::FieldError;
use crate::versioning::VersioningError;

/// Errors that can occur during tender operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TenderError {
    /// A content field failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] FieldError),

    /// Unknown status label.
    #[error("Invalid tender status: {0}")]
    InvalidStatus(String),

    /// Unknown service type.
    #[error("Invalid service type: {0}")]
    InvalidServiceType(String),

    /// Tender does not exist.
    #[error("Tender {0} not found")]
    NotFound(TenderId),

    /// Organization does not exist.
    #[error("Organization {0} not found")]
    OrganizationNotFound(OrganizationId),

    /// Caller is not responsible for the tender's organization.
    #[error("Not responsible for organization {0}")]
    NotResponsible(OrganizationId),

    /// Caller may not see the status of an unpublished tender.
    #[error("Tender status is only visible to its creator until published")]
    StatusHidden,

    /// Archiving or restoring a version failed.
    #[error(transparent)]
    Versioning(#[from] VersioningError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl TenderError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidStatus(_) | Self::InvalidServiceType(_) => 400,
            Self::NotResponsible(_) | Self::StatusHidden => 403,
            Self::NotFound(_) | Self::OrganizationNotFound(_) => 404,
            Self::Versioning(e) => e.status_code(),
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::InvalidServiceType(_) => "INVALID_SERVICE_TYPE",
            Self::NotFound(_) => "TENDER_NOT_FOUND",
            Self::OrganizationNotFound(_) => "ORGANIZATION_NOT_FOUND",
            Self::NotResponsible(_) | Self::StatusHidden => "FORBIDDEN",
            Self::Versioning(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioning_errors_keep_their_codes() {
        let err = TenderError::from(VersioningError::SameVersion(2));
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "SAME_VERSION");

        let err = TenderError::from(VersioningError::ArchiveFailed("boom".into()));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_not_responsible_is_forbidden() {
        let err = TenderError::NotResponsible(OrganizationId::new());
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "FORBIDDEN");
    }

    #[test]
    fn test_validation_error() {
        let err = TenderError::from(FieldError::Empty { field: "name" });
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Validation error: name must not be empty");
    }
}
