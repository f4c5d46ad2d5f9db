use super::*;

#[test]
fn test_validate_username() {
    assert!(validate_username("ana").is_ok());
    assert!(validate_username("film_lover-99").is_ok());

    assert!(validate_username("").is_err());
    assert!(validate_username("ab").is_err());
    assert!(validate_username("-dash").is_err());
    assert!(validate_username("_under").is_err());
    assert!(validate_username("UPPER").is_err());
    assert!(validate_username("has space").is_err());
    assert!(validate_username(&"a".repeat(33)).is_err());
}

#[test]
fn test_role_parse() {
    assert_eq!("user".parse::<PlatformRole>().unwrap(), PlatformRole::User);
    assert_eq!("admin".parse::<PlatformRole>().unwrap(), PlatformRole::Admin);
    assert_eq!("owner".parse::<PlatformRole>().unwrap(), PlatformRole::Owner);
    assert!(matches!(
        "superuser".parse::<PlatformRole>(),
        Err(UserError::InvalidRole(r)) if r == "superuser"
    ));
}

#[test]
fn test_role_is_staff() {
    assert!(!PlatformRole::User.is_staff());
    assert!(PlatformRole::Admin.is_staff());
    assert!(PlatformRole::Owner.is_staff());
}

#[test]
fn test_role_serializes_snake_case() {
    let json = serde_json::to_string(&PlatformRole::Owner).unwrap();
    assert_eq!(json, "\"owner\"");
    let role: PlatformRole = serde_json::from_str("\"admin\"").unwrap();
    assert_eq!(role, PlatformRole::Admin);
}

#[test]
fn test_user_serialization_is_camel_case() {
    let user = User {
        id: "u1".to_string(),
        username: "ana".to_string(),
        display_name: "Ana".to_string(),
        role: PlatformRole::User,
        created_at: "2025-01-01T00:00:00Z".to_string(),
        updated_at: "2025-01-01T00:00:00Z".to_string(),
    };
    let json = serde_json::to_string(&user).unwrap();
    assert!(json.contains("\"displayName\":\"Ana\""));
    assert!(json.contains("\"role\":\"user\""));
}
