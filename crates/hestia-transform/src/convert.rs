//! End-to-end conversion of a wide export into one row per record.

use polars::prelude::DataFrame;
use tracing::{info, info_span};

use hestia_model::ConversionConfig;

use crate::error::{Result, TransformError};
use crate::frame::{column_names, column_text_values, has_column, take_rows};
use crate::join::join_groups;
use crate::partition::partition;

/// Convert a flattened export into its canonical layout.
///
/// The result has exactly the input's columns, in the input's order, with the
/// rows rebuilt by the configured joins and sorted by `config.sort_key`.
///
/// # Errors
///
/// Fails when the config is invalid, when a group needed by the join sequence
/// is missing, when a join key or output column is absent, or when a join step
/// matches no rows.
pub fn convert(df: &DataFrame, config: &ConversionConfig) -> Result<DataFrame> {
    let span = info_span!("convert", rows = df.height(), columns = df.width());
    let _guard = span.enter();

    config.validate()?;
    let groups = partition(df, config)?;
    let merged = join_groups(&groups, config)?;
    let sorted = sort_by_key(&merged, &config.sort_key)?;

    let columns = column_names(df);
    for column in &columns {
        if !has_column(&sorted, column) {
            return Err(TransformError::MissingColumn {
                column: column.clone(),
                context: "not produced by the join sequence".to_string(),
            });
        }
    }
    let output = sorted.select(columns)?;

    info!(
        groups = groups.len(),
        input_rows = df.height(),
        output_rows = output.height(),
        "converted export"
    );
    Ok(output)
}

/// Stable ascending sort by the text value of one column.
///
/// Rows with equal keys keep their relative order; null keys sort first.
pub fn sort_by_key(df: &DataFrame, key: &str) -> Result<DataFrame> {
    let keys = column_text_values(df, key, "sort key")?;
    let mut indices: Vec<u32> = (0..df.height()).map(|idx| idx as u32).collect();
    indices.sort_by(|a, b| keys[*a as usize].cmp(&keys[*b as usize]));
    take_rows(df, indices)
}
