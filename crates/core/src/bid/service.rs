//! Bid rules: content validation, patching, decisions and feedback.

use tenderbid_shared::types::{EmployeeId, OrganizationId};

use crate::access::{self, Membership};
use crate::bid::error::BidError;
use crate::bid::types::{AuthorType, BidContent, BidPatch, BidStatus, DecisionKind, NewBid};
use crate::validation::{self, MAX_NAME_LEN};

/// Stateless service for bid rules.
pub struct BidService;

impl BidService {
    /// Validates creation input and returns the initial content.
    pub fn validate_new(input: &NewBid) -> Result<BidContent, BidError> {
        Ok(BidContent {
            name: validation::normalize_name(&input.name)?,
            description: validation::normalize_description(input.description.as_deref())?,
            status: BidStatus::Created,
            author_type: input.author_type,
            author_id: input.author_id,
        })
    }

    /// Applies a patch to the current content. Missing or blank fields keep
    /// their current value.
    pub fn apply_patch(current: &BidContent, patch: &BidPatch) -> Result<BidContent, BidError> {
        let name = validation::normalize_optional("name", patch.name.as_deref(), MAX_NAME_LEN)?;
        let description = validation::normalize_description(patch.description.as_deref())?;

        Ok(BidContent {
            name: name.unwrap_or_else(|| current.name.clone()),
            description: description.or_else(|| current.description.clone()),
            ..current.clone()
        })
    }

    /// Checks that a new bid may be placed.
    ///
    /// Authors cannot bid on their own tenders and may hold one bid per tender.
    pub fn check_new_bid(
        author: EmployeeId,
        tender_created_by: EmployeeId,
        already_bid: bool,
    ) -> Result<(), BidError> {
        if author == tender_created_by {
            return Err(BidError::OwnTender);
        }
        if already_bid {
            return Err(BidError::DuplicateBid);
        }
        Ok(())
    }

    /// Status changes, edits and rollbacks are reserved to the bid's creator.
    pub fn ensure_creator(caller: &Membership, created_by: EmployeeId) -> Result<(), BidError> {
        if !access::is_owner(caller, created_by) {
            return Err(BidError::NotCreator);
        }
        Ok(())
    }

    /// Checks the decision rules, in order: no self-decision, reviewer is
    /// responsible for the tender's organization, no prior decision, and the
    /// bid is in a decidable status.
    pub fn check_decision(
        reviewer: &Membership,
        bid_created_by: EmployeeId,
        tender_organization: OrganizationId,
        already_decided: bool,
        status: BidStatus,
    ) -> Result<(), BidError> {
        if access::is_owner(reviewer, bid_created_by) {
            return Err(BidError::SelfDecision);
        }
        if !access::is_responsible_for(reviewer, tender_organization) {
            return Err(BidError::NotResponsible(tender_organization));
        }
        if already_decided {
            return Err(BidError::DecisionExists);
        }
        Self::ensure_decidable(status)
    }

    /// Rejects decisions on drafts and withdrawn bids.
    pub fn ensure_decidable(status: BidStatus) -> Result<(), BidError> {
        if !status.is_decidable() {
            return Err(BidError::NotDecidable(status));
        }
        Ok(())
    }

    /// Checks the feedback rules: only the tender's creator, at most once.
    pub fn check_feedback(
        caller: &Membership,
        tender_created_by: EmployeeId,
        already_reviewed: bool,
    ) -> Result<(), BidError> {
        if !access::is_owner(caller, tender_created_by) {
            return Err(BidError::NotTenderCreator);
        }
        if already_reviewed {
            return Err(BidError::FeedbackExists);
        }
        Ok(())
    }

    /// Checks who may read feedback left on an author's bids.
    pub fn check_reviews_access(
        requester: &Membership,
        author: EmployeeId,
        tender_organization: OrganizationId,
    ) -> Result<(), BidError> {
        if access::is_owner(requester, author) {
            return Err(BidError::SelfReview);
        }
        if !access::is_responsible_for(requester, tender_organization) {
            return Err(BidError::NotResponsible(tender_organization));
        }
        Ok(())
    }

    /// Trims feedback text and rejects blank input.
    pub fn normalize_feedback(text: &str) -> Result<String, BidError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(BidError::EmptyFeedback);
        }
        Ok(trimmed.to_string())
    }

    /// Parses a status label.
    pub fn parse_status(raw: &str) -> Result<BidStatus, BidError> {
        BidStatus::parse(raw).ok_or_else(|| BidError::InvalidStatus(raw.to_string()))
    }

    /// Parses an author type label.
    pub fn parse_author_type(raw: &str) -> Result<AuthorType, BidError> {
        AuthorType::parse(raw).ok_or_else(|| BidError::InvalidAuthorType(raw.to_string()))
    }

    /// Parses a decision label.
    pub fn parse_decision(raw: &str) -> Result<DecisionKind, BidError> {
        DecisionKind::parse(raw).ok_or_else(|| BidError::InvalidDecision(raw.to_string()))
    }
}
