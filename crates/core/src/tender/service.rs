//! Tender rules: content validation, patching and who may touch a tender.

use tenderbid_shared::types::{EmployeeId, OrganizationId};

use crate::access::{self, Membership};
use crate::tender::error::TenderError;
use crate::tender::types::{NewTender, ServiceType, TenderContent, TenderPatch, TenderStatus};
use crate::validation::{self, MAX_NAME_LEN};

/// Stateless service for tender rules.
pub struct TenderService;

impl TenderService {
    /// Validates creation input and returns the initial content.
    ///
    /// New tenders always start as `Created`.
    pub fn validate_new(input: &NewTender) -> Result<TenderContent, TenderError> {
        Ok(TenderContent {
            name: validation::normalize_name(&input.name)?,
            description: validation::normalize_description(input.description.as_deref())?,
            status: TenderStatus::Created,
            service_type: input.service_type,
        })
    }

    /// Applies a patch to the current content.
    ///
    /// Missing or blank fields keep their current value, so a patch may leave
    /// the content unchanged. Status is not part of content edits.
    pub fn apply_patch(
        current: &TenderContent,
        patch: &TenderPatch,
    ) -> Result<TenderContent, TenderError> {
        let name = validation::normalize_optional("name", patch.name.as_deref(), MAX_NAME_LEN)?;
        let description = validation::normalize_description(patch.description.as_deref())?;

        Ok(TenderContent {
            name: name.unwrap_or_else(|| current.name.clone()),
            description: description.or_else(|| current.description.clone()),
            status: current.status,
            service_type: patch.service_type.unwrap_or(current.service_type),
        })
    }

    /// Parses a status label.
    pub fn parse_status(raw: &str) -> Result<TenderStatus, TenderError> {
        TenderStatus::parse(raw).ok_or_else(|| TenderError::InvalidStatus(raw.to_string()))
    }

    /// Parses a service type label.
    pub fn parse_service_type(raw: &str) -> Result<ServiceType, TenderError> {
        ServiceType::parse(raw).ok_or_else(|| TenderError::InvalidServiceType(raw.to_string()))
    }

    /// Creating, editing, rolling back, changing status and listing bids all
    /// require responsibility for the tender's organization.
    pub fn ensure_responsible(
        caller: &Membership,
        organization: OrganizationId,
    ) -> Result<(), TenderError> {
        if !access::is_responsible_for(caller, organization) {
            return Err(TenderError::NotResponsible(organization));
        }
        Ok(())
    }

    /// Checks that the caller may read the tender's status.
    pub fn ensure_status_visible(
        caller: &Membership,
        status: TenderStatus,
        created_by: EmployeeId,
    ) -> Result<(), TenderError> {
        if !access::can_view_tender_status(caller, status, created_by) {
            return Err(TenderError::StatusHidden);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldError;

    fn content() -> TenderContent {
        TenderContent {
            name: "Bridge".to_string(),
            description: Some("Steel bridge".to_string()),
            status: TenderStatus::Published,
            service_type: ServiceType::Construction,
        }
    }

    #[test]
    fn test_validate_new_starts_created() {
        let input = NewTender {
            name: "  Bridge ".to_string(),
            description: Some("".to_string()),
            service_type: ServiceType::Delivery,
            organization_id: OrganizationId::new(),
            created_by: EmployeeId::new(),
        };

        let content = TenderService::validate_new(&input).unwrap();
        assert_eq!(content.name, "Bridge");
        assert_eq!(content.description, None);
        assert_eq!(content.status, TenderStatus::Created);
        assert_eq!(content.service_type, ServiceType::Delivery);
    }

    #[test]
    fn test_validate_new_rejects_long_name() {
        let input = NewTender {
            name: "x".repeat(101),
            description: None,
            service_type: ServiceType::Delivery,
            organization_id: OrganizationId::new(),
            created_by: EmployeeId::new(),
        };
        assert!(matches!(
            TenderService::validate_new(&input),
            Err(TenderError::Validation(FieldError::TooLong { field: "name", .. }))
        ));
    }

    #[test]
    fn test_empty_patch_keeps_content() {
        let current = content();
        let patched = TenderService::apply_patch(&current, &TenderPatch::default()).unwrap();
        assert_eq!(patched, current);
    }

    #[test]
    fn test_blank_fields_keep_current_values() {
        let patch = TenderPatch {
            name: Some("   ".to_string()),
            description: Some(String::new()),
            service_type: None,
        };
        assert_eq!(TenderService::apply_patch(&content(), &patch).unwrap(), content());
    }

    #[test]
    fn test_patch_replaces_given_fields_only() {
        let patch = TenderPatch {
            name: Some("Tunnel".to_string()),
            description: None,
            service_type: Some(ServiceType::Manufacture),
        };
        let patched = TenderService::apply_patch(&content(), &patch).unwrap();

        assert_eq!(patched.name, "Tunnel");
        assert_eq!(patched.description.as_deref(), Some("Steel bridge"));
        assert_eq!(patched.service_type, ServiceType::Manufacture);
        assert_eq!(patched.status, TenderStatus::Published);
    }

    #[test]
    fn test_patch_rejects_long_description() {
        let patch = TenderPatch {
            description: Some("d".repeat(501)),
            ..TenderPatch::default()
        };
        assert!(TenderService::apply_patch(&content(), &patch).is_err());
    }

    #[test]
    fn test_parse_status_error() {
        assert_eq!(
            TenderService::parse_status("Open"),
            Err(TenderError::InvalidStatus("Open".to_string()))
        );
    }

    #[test]
    fn test_ensure_responsible() {
        let org = OrganizationId::new();
        let responsible = Membership::new(EmployeeId::new(), vec![org]);
        let outsider = Membership::employee(EmployeeId::new());

        assert!(TenderService::ensure_responsible(&responsible, org).is_ok());
        assert_eq!(
            TenderService::ensure_responsible(&outsider, org),
            Err(TenderError::NotResponsible(org))
        );
    }

    #[test]
    fn test_status_hidden_from_strangers_until_published() {
        let creator = EmployeeId::new();
        let stranger = Membership::employee(EmployeeId::new());

        assert_eq!(
            TenderService::ensure_status_visible(&stranger, TenderStatus::Created, creator),
            Err(TenderError::StatusHidden)
        );
        assert!(
            TenderService::ensure_status_visible(&stranger, TenderStatus::Published, creator)
                .is_ok()
        );
    }
}
