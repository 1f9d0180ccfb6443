use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_image_id_is_v4() {
    let id = ImageId::new();
    assert_eq!(id.into_inner().get_version_num(), 4);
}

#[test]
fn test_image_ids_are_distinct() {
    assert_ne!(ImageId::new(), ImageId::new());
}

#[test]
fn test_image_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = ImageId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_image_id_display_is_canonical() {
    let uuid = Uuid::parse_str("550E8400-E29B-41D4-A716-446655440000").unwrap();
    let id = ImageId::from_uuid(uuid);
    assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    assert_eq!(id.to_string().len(), 36);
}

#[test]
fn test_image_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = ImageId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_image_id_from_str_error() {
    assert!(ImageId::from_str("invalid").is_err());
    assert!(ImageId::from_str("").is_err());
}
