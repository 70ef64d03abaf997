//! DataFrame access helpers shared by the transform stages.

use polars::prelude::{AnyValue, DataFrame, UInt32Chunked};

use hestia_ingest::any_to_string;

use crate::error::{Result, TransformError};

/// Column names of a DataFrame, in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Text of every cell in a column; nulls stay `None`.
pub fn column_text_values(
    df: &DataFrame,
    name: &str,
    context: &str,
) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| TransformError::MissingColumn {
            column: name.to_string(),
            context: context.to_string(),
        })?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        if value.is_null() {
            values.push(None);
        } else {
            values.push(Some(any_to_string(value)));
        }
    }
    Ok(values)
}

/// Gather rows by position.
pub fn take_rows(df: &DataFrame, indices: Vec<u32>) -> Result<DataFrame> {
    let idx = UInt32Chunked::from_vec("idx".into(), indices);
    Ok(df.take(&idx)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    #[test]
    fn column_text_values_keeps_nulls() {
        let df = DataFrame::new(vec![
            Series::new("site.@id".into(), vec![Some("s1"), None]).into(),
        ])
        .unwrap();
        let values = column_text_values(&df, "site.@id", "test").unwrap();
        assert_eq!(values, vec![Some("s1".to_string()), None]);
    }

    #[test]
    fn column_text_values_missing_column() {
        let df = DataFrame::new(vec![Series::new("a".into(), vec!["1"]).into()]).unwrap();
        let result = column_text_values(&df, "b", "join key");
        assert!(matches!(
            result,
            Err(TransformError::MissingColumn { column, context }) if column == "b" && context == "join key"
        ));
    }

    #[test]
    fn take_rows_reorders_and_repeats() {
        let df = DataFrame::new(vec![Series::new("a".into(), vec!["x", "y"]).into()]).unwrap();
        let taken = take_rows(&df, vec![1, 0, 1]).unwrap();
        let values = taken.column("a").unwrap().str().unwrap();
        assert_eq!(values.get(0), Some("y"));
        assert_eq!(values.get(1), Some("x"));
        assert_eq!(values.get(2), Some("y"));
    }
}
