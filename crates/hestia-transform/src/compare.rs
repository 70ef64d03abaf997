//! Cell-by-cell comparison of a converted table against an expected one.

use polars::prelude::{AnyValue, DataFrame};
use tracing::{info, info_span};

use hestia_ingest::any_to_string;
use hestia_model::ConversionConfig;

use crate::coerce::coerce;
use crate::convert::{convert, sort_by_key};
use crate::error::Result;
use crate::frame::column_names;

/// One differing cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMismatch {
    pub row: usize,
    pub column: String,
    pub actual: String,
    pub expected: String,
}

/// Outcome of comparing two tables.
#[derive(Debug, Clone, Default)]
pub struct FrameComparison {
    pub actual_columns: Vec<String>,
    pub expected_columns: Vec<String>,
    pub actual_rows: usize,
    pub expected_rows: usize,
    /// First mismatching cells, capped by the comparison limit.
    pub mismatches: Vec<CellMismatch>,
    /// Total number of mismatching cells.
    pub mismatch_count: usize,
}

impl FrameComparison {
    pub fn columns_match(&self) -> bool {
        self.actual_columns == self.expected_columns
    }

    pub fn rows_match(&self) -> bool {
        self.actual_rows == self.expected_rows
    }

    pub fn is_equal(&self) -> bool {
        self.columns_match() && self.rows_match() && self.mismatch_count == 0
    }

    /// Columns present in the actual table only.
    pub fn unexpected_columns(&self) -> Vec<&str> {
        self.actual_columns
            .iter()
            .filter(|name| !self.expected_columns.contains(name))
            .map(String::as_str)
            .collect()
    }

    /// Columns present in the expected table only.
    pub fn missing_columns(&self) -> Vec<&str> {
        self.expected_columns
            .iter()
            .filter(|name| !self.actual_columns.contains(name))
            .map(String::as_str)
            .collect()
    }
}

/// Compare two tables column-by-column and row-by-row.
///
/// Cells are compared for every column both tables share, over the rows both
/// tables have. Null equals null and NaN equals NaN. At most `max_mismatches`
/// cells are recorded; all are counted.
pub fn compare(
    actual: &DataFrame,
    expected: &DataFrame,
    max_mismatches: usize,
) -> Result<FrameComparison> {
    let mut comparison = FrameComparison {
        actual_columns: column_names(actual),
        expected_columns: column_names(expected),
        actual_rows: actual.height(),
        expected_rows: expected.height(),
        ..FrameComparison::default()
    };

    let rows = actual.height().min(expected.height());
    for name in &comparison.expected_columns {
        let (Ok(left), Ok(right)) = (actual.column(name), expected.column(name)) else {
            continue;
        };
        for row in 0..rows {
            let left_value = left.get(row)?;
            let right_value = right.get(row)?;
            if values_equal(&left_value, &right_value) {
                continue;
            }
            comparison.mismatch_count += 1;
            if comparison.mismatches.len() < max_mismatches {
                comparison.mismatches.push(CellMismatch {
                    row,
                    column: name.clone(),
                    actual: display_value(left_value),
                    expected: display_value(right_value),
                });
            }
        }
    }
    Ok(comparison)
}

/// Convert `input`, then compare it with `expected` after both have been
/// coerced through the config's schema and ordered by the sort key.
pub fn check(
    input: &DataFrame,
    expected: &DataFrame,
    config: &ConversionConfig,
    max_mismatches: usize,
) -> Result<FrameComparison> {
    let span = info_span!("check", input_rows = input.height(), expected_rows = expected.height());
    let _guard = span.enter();

    let converted = coerce(&convert(input, config)?, &config.schema)?;
    let expected = coerce(&sort_by_key(expected, &config.sort_key)?, &config.schema)?;
    let comparison = compare(&converted, &expected, max_mismatches)?;
    info!(
        equal = comparison.is_equal(),
        mismatches = comparison.mismatch_count,
        "compared converted export"
    );
    Ok(comparison)
}

fn values_equal(left: &AnyValue<'_>, right: &AnyValue<'_>) -> bool {
    match (left, right) {
        (AnyValue::Null, AnyValue::Null) => true,
        (AnyValue::Float64(a), AnyValue::Float64(b)) if a.is_nan() && b.is_nan() => true,
        (AnyValue::Float32(a), AnyValue::Float32(b)) if a.is_nan() && b.is_nan() => true,
        _ => left == right,
    }
}

fn display_value(value: AnyValue<'_>) -> String {
    if value.is_null() {
        "<null>".to_string()
    } else {
        any_to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn frame(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
        DataFrame::new(
            columns
                .into_iter()
                .map(|(name, values)| Series::new(name.into(), values).into_column())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn identical_frames_are_equal() {
        let df = frame(vec![("a", vec![Some("1"), None]), ("b", vec![Some("x"), Some("y")])]);
        let comparison = compare(&df, &df.clone(), 10).unwrap();
        assert!(comparison.is_equal());
    }

    #[test]
    fn cell_mismatches_are_reported_and_capped() {
        let actual = frame(vec![("a", vec![Some("1"), Some("2"), Some("3")])]);
        let expected = frame(vec![("a", vec![Some("1"), Some("9"), None])]);

        let comparison = compare(&actual, &expected, 1).unwrap();

        assert!(!comparison.is_equal());
        assert_eq!(comparison.mismatch_count, 2);
        assert_eq!(
            comparison.mismatches,
            vec![CellMismatch {
                row: 1,
                column: "a".to_string(),
                actual: "2".to_string(),
                expected: "9".to_string(),
            }]
        );
    }

    #[test]
    fn column_and_row_differences_are_reported() {
        let actual = frame(vec![("a", vec![Some("1")]), ("extra", vec![Some("x")])]);
        let expected = frame(vec![("a", vec![Some("1"), Some("2")]), ("b", vec![None, None])]);

        let comparison = compare(&actual, &expected, 10).unwrap();

        assert!(!comparison.columns_match());
        assert!(!comparison.rows_match());
        assert_eq!(comparison.unexpected_columns(), vec!["extra"]);
        assert_eq!(comparison.missing_columns(), vec!["b"]);
        assert_eq!(comparison.mismatch_count, 0);
    }

    #[test]
    fn nan_equals_nan() {
        let df = DataFrame::new(vec![
            Series::new("v".into(), vec![Some(f64::NAN)]).into_column(),
        ])
        .unwrap();
        assert!(compare(&df, &df.clone(), 10).unwrap().is_equal());
    }
}
