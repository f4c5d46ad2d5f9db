use super::*;

#[test]
fn test_now_iso_format() {
    let timestamp = now_iso();

    assert!(timestamp.len() > 20, "Timestamp should be reasonably long");
    assert!(timestamp.contains('-'), "Should contain date separator");
    assert!(timestamp.contains(':'), "Should contain time separator");

    let parsed = chrono::DateTime::parse_from_rfc3339(&timestamp);
    assert!(parsed.is_ok(), "Should be valid RFC3339 format");
}

#[test]
fn test_new_id_is_unique_uuid() {
    let a = new_id();
    let b = new_id();
    assert_ne!(a, b);
    assert!(uuid::Uuid::parse_str(&a).is_ok());
}

#[test]
fn test_slugify_name() {
    assert_eq!(slugify_name("Street Photography"), "street-photography");
    assert_eq!(slugify_name("  Film & Grain  "), "film-grain");
    assert_eq!(slugify_name("UPPER case"), "upper-case");
}

#[test]
fn test_slugify_name_collides_on_case_and_spacing() {
    assert_eq!(slugify_name("Night Walks"), slugify_name("night   walks"));
}

#[test]
fn test_format_duration() {
    let formatted = format_duration(std::time::Duration::from_secs(3600));
    assert_eq!(formatted, "1h");
}
