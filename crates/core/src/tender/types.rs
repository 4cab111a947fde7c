//! Tender domain types.

use serde::{Deserialize, Serialize};

use tenderbid_shared::types::{EmployeeId, OrganizationId};

use crate::labels::label_enum;

/// Publication status of a tender.
///
/// Status is a free label: any value may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenderStatus {
    /// Draft, visible to its creator only.
    Created,
    /// Open for bids and visible to everyone.
    Published,
    /// No longer accepting bids.
    Closed,
}

label_enum!(TenderStatus { Created, Published, Closed });

/// Kind of work a tender procures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    /// Construction works.
    Construction,
    /// Delivery of goods.
    Delivery,
    /// Manufacturing.
    Manufacture,
}

label_enum!(ServiceType { Construction, Delivery, Manufacture });

/// The versioned fields of a tender.
///
/// This is exactly what one history row stores and what a rollback restores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderContent {
    /// Display name.
    pub name: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Status label.
    pub status: TenderStatus,
    /// Procured service.
    pub service_type: ServiceType,
}

/// Unvalidated input for creating a tender.
#[derive(Debug, Clone)]
pub struct NewTender {
    /// Display name.
    pub name: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Procured service.
    pub service_type: ServiceType,
    /// Publishing organization.
    pub organization_id: OrganizationId,
    /// Employee creating the tender.
    pub created_by: EmployeeId,
}

/// Partial content update. `None` or blank fields keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenderPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New service type.
    pub service_type: Option<ServiceType>,
}
