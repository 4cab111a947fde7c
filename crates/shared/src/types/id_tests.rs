use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_creation() {
    let id = EmployeeId::new();
    assert!(!id.to_string().is_empty());
}

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = OrganizationId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_id_default_is_v7() {
    let id = TenderId::default();
    assert_eq!(id.into_inner().get_version_num(), 7);
}

#[test]
fn test_typed_id_display() {
    let uuid = Uuid::new_v4();
    let id = BidId::from_uuid(uuid);
    assert_eq!(format!("{id}"), uuid.to_string());
}

#[test]
fn test_typed_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = EmployeeId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_id_from_str_error() {
    assert!(TenderId::from_str("not-a-uuid").is_err());
}

#[test]
fn test_typed_id_serde_is_transparent() {
    let uuid = Uuid::new_v4();
    let json = serde_json::to_string(&BidId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
}
