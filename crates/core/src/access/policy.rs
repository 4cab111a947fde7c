//! Caller membership and access predicates.

use tenderbid_shared::types::{EmployeeId, OrganizationId};

use crate::tender::TenderStatus;

/// An employee together with the organizations they are responsible for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    /// The calling employee.
    pub employee_id: EmployeeId,
    /// Organizations the employee is registered as responsible for.
    pub organizations: Vec<OrganizationId>,
}

impl Membership {
    /// Creates a membership snapshot.
    #[must_use]
    pub fn new(employee_id: EmployeeId, organizations: Vec<OrganizationId>) -> Self {
        Self {
            employee_id,
            organizations,
        }
    }

    /// Membership of an employee without any responsibilities.
    #[must_use]
    pub fn employee(employee_id: EmployeeId) -> Self {
        Self::new(employee_id, Vec::new())
    }
}

/// Returns true if the caller is responsible for `organization`.
#[must_use]
pub fn is_responsible_for(caller: &Membership, organization: OrganizationId) -> bool {
    caller.organizations.contains(&organization)
}

/// Returns true if the caller created the entity.
#[must_use]
pub fn is_owner(caller: &Membership, created_by: EmployeeId) -> bool {
    caller.employee_id == created_by
}

/// Published tenders expose their status to anyone; otherwise only the
/// creator may see it.
#[must_use]
pub fn can_view_tender_status(
    caller: &Membership,
    status: TenderStatus,
    created_by: EmployeeId,
) -> bool {
    status == TenderStatus::Published || is_owner(caller, created_by)
}
