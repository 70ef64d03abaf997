//! Integration tests for the command layer.

use std::fs;
use std::path::{Path, PathBuf};

use hestia_cli::commands::{load_config, run_check, run_compare, run_config, run_convert};
use hestia_model::{ConversionConfig, MissingGroupPolicy};

const EXPORT: &str = "\
cycle.@id,cycle.name,cycle.site.@id,site.@id,site.name,impactAssessment.@id,impactAssessment.cycle.@id,impactAssessment.source.@id,source.@id,source.name
c2,Barley,s2,-,-,-,-,-,-,-
c1,Wheat,s1,-,-,-,-,-,-,-
-,-,-,s1,North,-,-,-,-,-
-,-,-,s2,South,-,-,-,-,-
-,-,-,-,-,i1,c1,r1,-,-
-,-,-,-,-,i2,c2,r2,-,-
-,-,-,-,-,-,-,-,r2,Doe
-,-,-,-,-,-,-,-,r1,Roe
";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write file");
    path
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../hestia-transform/tests/data")
        .join(name)
}

#[test]
fn test_convert_writes_rebuilt_records() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(dir.path(), "export.csv", EXPORT);
    let output = dir.path().join("out").join("records.csv");

    let result = run_convert(&input, &output, &ConversionConfig::hestia()).expect("convert");

    assert_eq!(result.input_rows, 8);
    assert_eq!(result.output_rows, 2);
    assert_eq!(result.columns, 10);
    let names: Vec<&str> = result.groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["cycle", "site", "impactAssessment", "source"]);
    assert!(result.groups.iter().all(|g| g.records == 2 && g.dropped_rows == 6));

    let written = fs::read_to_string(&output).expect("read output");
    insta::assert_snapshot!(written.trim_end());
}

#[test]
fn test_convert_reports_missing_group_with_context() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(dir.path(), "sites.csv", "site.@id,site.name\ns1,North\n");
    let output = dir.path().join("out.csv");

    let error = run_convert(&input, &output, &ConversionConfig::hestia()).unwrap_err();

    let message = format!("{error:#}");
    assert!(message.starts_with("convert "), "{message}");
    assert!(message.contains("cycle"), "{message}");
    assert!(!output.exists());
}

#[test]
fn test_check_accepts_reference_fixture() {
    let result = run_check(
        &fixture("input.csv"),
        &fixture("output.csv"),
        &ConversionConfig::hestia(),
        10,
    )
    .expect("check");

    assert!(result.is_equal(), "{:?}", result.comparison.mismatches);
}

#[test]
fn test_compare_detects_changed_value() {
    let dir = tempfile::tempdir().expect("temp dir");
    let expected = fs::read_to_string(fixture("output.csv")).expect("read fixture");
    let changed = expected.replacen("c-002,", "c-009,", 1);
    let actual = write(dir.path(), "actual.csv", &changed);

    let result = run_compare(&actual, &fixture("output.csv"), &ConversionConfig::hestia(), 10)
        .expect("compare");

    assert!(!result.is_equal());
    assert!(result.comparison.rows_match());
    assert!(result.comparison.columns_match());
    assert_eq!(result.comparison.mismatches[0].column, "cycle.@id");
    assert_eq!(result.comparison.mismatches[0].actual, "c-009");
}

#[test]
fn test_compare_identical_tables_are_equal() {
    let result = run_compare(
        &fixture("output.csv"),
        &fixture("output.csv"),
        &ConversionConfig::hestia(),
        10,
    )
    .expect("compare");
    assert!(result.is_equal());
}

#[test]
fn test_load_config_from_file_and_default() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ConversionConfig::hestia().with_missing_groups(MissingGroupPolicy::Skip);
    let path = write(
        dir.path(),
        "config.json",
        &config.to_json_pretty().expect("serialize"),
    );

    let loaded = load_config(Some(&path)).expect("load");
    let default = load_config(None).expect("default");

    assert_eq!(loaded, config);
    assert_eq!(default, ConversionConfig::hestia());
}

#[test]
fn test_load_config_error_names_file() {
    let error = load_config(Some(Path::new("/nonexistent/hestia.json"))).unwrap_err();
    assert!(format!("{error}").contains("/nonexistent/hestia.json"));
}

#[test]
fn test_run_config_round_trips() {
    let json = run_config().expect("render");
    let parsed = ConversionConfig::from_json_str(&json).expect("parse");
    assert_eq!(parsed, ConversionConfig::hestia());
}
