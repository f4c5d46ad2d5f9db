use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_empty_toml_produces_defaults() {
    let config: ServerConfig = toml::from_str("").unwrap();
    assert_eq!(config, ServerConfig::default());
    assert_eq!(
        config.session_ttl().unwrap(),
        Duration::from_secs(30 * 24 * 60 * 60)
    );
}

#[test]
fn test_partial_sections() {
    let config: ServerConfig =
        toml::from_str("[server]\nsession_ttl = \"12h\"\n\n[limits]\nmax_gallery_images = 10\n")
            .unwrap();
    assert_eq!(config.session_ttl().unwrap(), Duration::from_secs(12 * 3600));
    assert_eq!(config.limits.max_gallery_images, 10);
    assert_eq!(config.limits.max_blocks_per_parent, 200);
}

#[test]
fn test_unknown_field_is_rejected() {
    let result: Result<ServerConfig, _> = toml::from_str("[limits]\nmax_widgets = 3\n");
    assert!(result.is_err());
}

#[test]
fn test_load_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = load_config_from(&dir.path().join("config.toml")).unwrap();
    assert_eq!(config, ServerConfig::default());
}

#[test]
fn test_load_validates_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    fs::write(&path, "[server]\nsession_ttl = \"soon\"\n").unwrap();
    assert!(matches!(
        load_config_from(&path),
        Err(ConfigError::InvalidDuration { .. })
    ));

    fs::write(&path, "[server]\nsession_ttl = \"300000years\"\n").unwrap();
    assert!(matches!(
        load_config_from(&path),
        Err(ConfigError::DurationTooLong { .. })
    ));

    fs::write(&path, "[server]\nsession_ttl = \"366days\"\n").unwrap();
    assert!(load_config_from(&path).is_ok());

    fs::write(&path, "[limits]\nmax_search_results = 0\n").unwrap();
    assert!(matches!(
        load_config_from(&path),
        Err(ConfigError::InvalidLimit { value: 0, .. })
    ));

    fs::write(&path, "[limits]\nmax_search_results = 5\n").unwrap();
    assert_eq!(load_config_from(&path).unwrap().limits.max_search_results, 5);
}

#[test]
fn test_config_path_location() {
    if let Some(path) = config_path() {
        assert!(path.ends_with(".streams/config.toml"));
    }
}
