use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use hestia_ingest::{read_csv_table, write_csv_table};
use hestia_model::ConversionConfig;
use hestia_transform::{check, coerce, compare, convert, partition};

use crate::types::{CompareResult, ConvertResult, GroupSummary};

/// Load the conversion config from `path`, or the built-in Hestia layout.
pub fn load_config(path: Option<&Path>) -> Result<ConversionConfig> {
    match path {
        Some(path) => ConversionConfig::load(path)
            .with_context(|| format!("load config {}", path.display())),
        None => Ok(ConversionConfig::hestia()),
    }
}

/// Built-in config rendered as pretty JSON.
pub fn run_config() -> Result<String> {
    ConversionConfig::hestia()
        .to_json_pretty()
        .context("serialize built-in config")
}

pub fn run_convert(
    input: &Path,
    output: &Path,
    config: &ConversionConfig,
) -> Result<ConvertResult> {
    let span = info_span!("convert_file", input = %input.display(), output = %output.display());
    let _guard = span.enter();
    let start = Instant::now();

    let df = read_table(input)?;
    let groups: Vec<GroupSummary> = partition(&df, config)
        .with_context(|| format!("partition {}", input.display()))?
        .iter()
        .map(|table| GroupSummary {
            name: table.name.clone(),
            columns: table.frame.width(),
            records: table.record_count(),
            dropped_rows: table.dropped_rows,
        })
        .collect();
    let mut converted =
        convert(&df, config).with_context(|| format!("convert {}", input.display()))?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    write_csv_table(&mut converted, output)
        .with_context(|| format!("write {}", output.display()))?;

    info!(
        input_rows = df.height(),
        output_rows = converted.height(),
        duration_ms = start.elapsed().as_millis(),
        "wrote converted export"
    );
    Ok(ConvertResult {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        input_rows: df.height(),
        output_rows: converted.height(),
        columns: converted.width(),
        groups,
    })
}

/// Coerce both tables through the config's schema and compare them as-is.
pub fn run_compare(
    actual: &Path,
    expected: &Path,
    config: &ConversionConfig,
    max_mismatches: usize,
) -> Result<CompareResult> {
    let span = info_span!("compare", actual = %actual.display(), expected = %expected.display());
    let _guard = span.enter();

    let left = coerce(&read_table(actual)?, &config.schema)
        .with_context(|| format!("coerce {}", actual.display()))?;
    let right = coerce(&read_table(expected)?, &config.schema)
        .with_context(|| format!("coerce {}", expected.display()))?;
    let comparison = compare(&left, &right, max_mismatches).context("compare tables")?;
    info!(
        equal = comparison.is_equal(),
        mismatches = comparison.mismatch_count,
        "compared tables"
    );
    Ok(CompareResult {
        actual: actual.to_path_buf(),
        expected: expected.to_path_buf(),
        comparison,
    })
}

pub fn run_check(
    input: &Path,
    expected: &Path,
    config: &ConversionConfig,
    max_mismatches: usize,
) -> Result<CompareResult> {
    let input_df = read_table(input)?;
    let expected_df = read_table(expected)?;
    let comparison = check(&input_df, &expected_df, config, max_mismatches)
        .with_context(|| format!("check {} against {}", input.display(), expected.display()))?;
    Ok(CompareResult {
        actual: input.to_path_buf(),
        expected: expected.to_path_buf(),
        comparison,
    })
}

fn read_table(path: &Path) -> Result<DataFrame> {
    read_csv_table(path).with_context(|| format!("read {}", path.display()))
}
