//! Bid error types.

use thiserror::Error;

use tenderbid_shared::types::{BidId, OrganizationId, TenderId};

use crate::bid::types::BidStatus;
use crate::validation::FieldError;
use crate::versioning::VersioningError;

/// Errors that can occur during bid operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BidError {
    /// A content field failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] FieldError),

    /// Unknown status label.
    #[error("Invalid bid status: {0}")]
    InvalidStatus(String),

    /// Unknown author type.
    #[error("Invalid author type: {0}")]
    InvalidAuthorType(String),

    /// Unknown decision.
    #[error("Invalid decision: {0}")]
    InvalidDecision(String),

    /// Feedback text is blank.
    #[error("Feedback must not be empty")]
    EmptyFeedback,

    /// An employee tried to bid on a tender they created.
    #[error("Cannot bid on your own tender")]
    OwnTender,

    /// The author already has a bid on this tender.
    #[error("A bid for this tender already exists")]
    DuplicateBid,

    /// The bid author is not a known employee.
    #[error("Author {0} does not exist")]
    UnknownAuthor(String),

    /// Bid does not exist.
    #[error("Bid {0} not found")]
    NotFound(BidId),

    /// Tender does not exist.
    #[error("Tender {0} not found")]
    TenderNotFound(TenderId),

    /// Only the bid's creator may do this.
    #[error("Only the bid creator may perform this action")]
    NotCreator,

    /// Only the creator of the bid's tender may leave feedback.
    #[error("Only the tender creator may leave feedback")]
    NotTenderCreator,

    /// Caller is not responsible for the tender's organization.
    #[error("Not responsible for organization {0}")]
    NotResponsible(OrganizationId),

    /// Reviewer tried to decide on their own bid.
    #[error("Cannot decide on your own bid")]
    SelfDecision,

    /// Requester asked for reviews of their own bids.
    #[error("Cannot request reviews of your own bids")]
    SelfReview,

    /// Bid is in a status that does not accept decisions.
    #[error("Bid in status {0} cannot be decided")]
    NotDecidable(BidStatus),

    /// A decision was already recorded.
    #[error("A decision was already submitted for this bid")]
    DecisionExists,

    /// Feedback was already recorded.
    #[error("Feedback was already submitted for this bid")]
    FeedbackExists,

    /// The author has no bids on the tender.
    #[error("No bids found for the author")]
    NoBids,

    /// None of the author's bids has feedback.
    #[error("No feedback found")]
    NoFeedback,

    /// Archiving or restoring a version failed.
    #[error(transparent)]
    Versioning(#[from] VersioningError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl BidError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::InvalidStatus(_)
            | Self::InvalidAuthorType(_)
            | Self::InvalidDecision(_)
            | Self::EmptyFeedback
            | Self::OwnTender => 400,
            Self::UnknownAuthor(_) => 401,
            Self::NotCreator
            | Self::NotTenderCreator
            | Self::NotResponsible(_)
            | Self::SelfDecision
            | Self::SelfReview
            | Self::NotDecidable(_) => 403,
            Self::NotFound(_) | Self::TenderNotFound(_) | Self::NoBids | Self::NoFeedback => 404,
            Self::DuplicateBid | Self::DecisionExists | Self::FeedbackExists => 409,
            Self::Versioning(e) => e.status_code(),
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::EmptyFeedback => "VALIDATION_ERROR",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::InvalidAuthorType(_) => "INVALID_AUTHOR_TYPE",
            Self::InvalidDecision(_) => "INVALID_DECISION",
            Self::OwnTender => "OWN_TENDER",
            Self::DuplicateBid => "DUPLICATE_BID",
            Self::UnknownAuthor(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "BID_NOT_FOUND",
            Self::TenderNotFound(_) => "TENDER_NOT_FOUND",
            Self::NotCreator
            | Self::NotTenderCreator
            | Self::NotResponsible(_)
            | Self::SelfReview => "FORBIDDEN",
            Self::SelfDecision => "SELF_DECISION",
            Self::NotDecidable(_) => "BID_NOT_DECIDABLE",
            Self::DecisionExists => "DECISION_EXISTS",
            Self::FeedbackExists => "FEEDBACK_EXISTS",
            Self::NoBids => "BIDS_NOT_FOUND",
            Self::NoFeedback => "FEEDBACK_NOT_FOUND",
            Self::Versioning(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
