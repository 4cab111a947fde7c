//! Bid domain types.

use serde::{Deserialize, Serialize};

use tenderbid_shared::types::{EmployeeId, TenderId};

use crate::labels::label_enum;

/// Status of a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidStatus {
    /// Draft, not yet visible to the tender's organization.
    Created,
    /// Submitted for review.
    Published,
    /// Withdrawn by its author.
    Canceled,
}

label_enum!(BidStatus { Created, Published, Canceled });

impl BidStatus {
    /// Returns true if a decision may be recorded for a bid in this status.
    ///
    /// Drafts and withdrawn bids are excluded; any other status is decidable.
    #[must_use]
    pub fn is_decidable(&self) -> bool {
        !matches!(self, Self::Created | Self::Canceled)
    }
}

/// Who a bid is submitted on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorType {
    /// On behalf of an organization.
    Organization,
    /// On the employee's own behalf.
    User,
}

label_enum!(AuthorType { Organization, User });

/// Outcome of reviewing a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionKind {
    /// Bid accepted.
    Approved,
    /// Bid declined.
    Rejected,
}

label_enum!(DecisionKind { Approved, Rejected });

/// The versioned fields of a bid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidContent {
    /// Display name.
    pub name: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Status label.
    pub status: BidStatus,
    /// Kind of author.
    pub author_type: AuthorType,
    /// Submitting employee.
    pub author_id: EmployeeId,
}

/// Unvalidated input for creating a bid.
#[derive(Debug, Clone)]
pub struct NewBid {
    /// Display name.
    pub name: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Tender being bid on.
    pub tender_id: TenderId,
    /// Kind of author.
    pub author_type: AuthorType,
    /// Submitting employee, also recorded as the bid's creator.
    pub author_id: EmployeeId,
}

/// Partial content update. `None` or blank fields keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}
