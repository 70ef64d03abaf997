//! Integration tests for loading conversion configs from disk.

use std::io::Write;

use hestia_model::{ColumnType, ConfigError, ConversionConfig, JoinSource, MissingGroupPolicy};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

#[test]
fn test_hestia_config_round_trips_through_file() {
    let config = ConversionConfig::hestia().with_missing_groups(MissingGroupPolicy::Skip);
    let file = write_config(&config.to_json_pretty().unwrap());

    let loaded = ConversionConfig::load(file.path()).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_load_custom_config() {
    let file = write_config(
        r#"{
            "groups": [
                { "name": "farm", "pattern": "^farm\\." },
                { "name": "field", "pattern": "^field\\." }
            ],
            "joins": [
                {
                    "left": { "group": "farm" },
                    "left_key": "farm.@id",
                    "right": "field",
                    "right_key": "field.farm.@id"
                }
            ],
            "sort_key": "field.@id",
            "missing_value": "NA",
            "missing_groups": "skip",
            "schema": { "field.area": "float", "field.irrigated": "boolean" }
        }"#,
    );

    let config = ConversionConfig::load(file.path()).unwrap();

    assert_eq!(config.groups.len(), 2);
    assert_eq!(config.joins[0].left, JoinSource::Group("farm".to_string()));
    assert_eq!(config.missing_value, "NA");
    assert_eq!(config.missing_groups, MissingGroupPolicy::Skip);
    assert_eq!(config.schema.get("field.area"), Some(ColumnType::Float));
    assert_eq!(config.schema.get("field.irrigated"), Some(ColumnType::Boolean));
}

#[test]
fn test_load_missing_file() {
    let result = ConversionConfig::load(std::path::Path::new("/nonexistent/config.json"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_load_rejects_config_without_joins() {
    let file = write_config(
        r#"{ "groups": [{ "name": "a", "pattern": "^a\\." }], "joins": [], "sort_key": "a.id" }"#,
    );
    let result = ConversionConfig::load(file.path());
    assert!(matches!(result, Err(ConfigError::NoJoins)));
}

#[test]
fn test_load_rejects_malformed_json() {
    let file = write_config("{ \"groups\": ");
    let result = ConversionConfig::load(file.path());
    assert!(matches!(result, Err(ConfigError::Json(_))));
}

#[test]
fn test_hestia_config_json_snapshot() {
    let config = ConversionConfig::hestia().with_schema(Default::default());
    insta::assert_snapshot!(config.to_json_pretty().unwrap());
}
