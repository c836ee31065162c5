use list_schema::config::{ConfigError, SchemaConfig};
use list_schema::logging::LogConfigError;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_empty_config_uses_defaults() {
    let config = SchemaConfig::from_toml_str("").unwrap();
    assert!(config.compile.reject_reserved_field_names);
    assert_eq!(config.logging.features.get("access").map(String::as_str), Some("WARN"));
}

#[test]
fn test_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[compile]
reject_reserved_field_names = false

[logging.features]
resolve = "DEBUG"
"#
    )
    .unwrap();

    let config = SchemaConfig::from_file(file.path()).unwrap();
    assert!(!config.compile.reject_reserved_field_names);
    assert_eq!(
        config.logging.features.get("resolve").map(String::as_str),
        Some("DEBUG")
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = SchemaConfig::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_malformed_toml_is_rejected() {
    let result = SchemaConfig::from_toml_str("[compile\nreject_reserved_field_names = 1");
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn test_unknown_log_feature_is_rejected() {
    let result = SchemaConfig::from_toml_str("[logging.features]\nnetwork = \"DEBUG\"\n");
    assert!(matches!(
        result,
        Err(ConfigError::Logging(LogConfigError::UnknownFeature(feature))) if feature == "network"
    ));
}
