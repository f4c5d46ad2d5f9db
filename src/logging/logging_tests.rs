use super::*;

#[test]
fn test_log_config_default() {
    let config = LogConfig::default();
    assert_eq!(config.log_level, Level::INFO);
    assert!(!config.json_format);
    assert!(config.log_dir.ends_with(".streams/logs"));
}

#[test]
fn test_parse_rotation() {
    // Compared through Debug output.
    let debug = |s: &str| format!("{:?}", parse_rotation(s));
    assert_eq!(debug("HOURLY"), format!("{:?}", Rotation::HOURLY));
    assert_eq!(debug("never"), format!("{:?}", Rotation::NEVER));
    assert_eq!(debug("weekly"), format!("{:?}", Rotation::DAILY));
}

#[test]
fn test_log_file_path_is_empty_until_set() {
    // Other tests never initialize logging.
    assert!(get_log_file_path().is_empty() || get_log_file_path().ends_with(LOG_FILENAME));
}
