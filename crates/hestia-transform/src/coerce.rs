//! Schema coercion applied before two tables are compared.
//!
//! A raw export and a converted table both come out of CSV as text. Casting
//! the columns named by a [`SchemaMap`] gives both sides the same types, so
//! `"12.50"` and `"12.5"` compare equal as floats.

use polars::prelude::{AnyValue, Column, DataFrame, NamedFrom, Series};

use hestia_ingest::{any_to_string, parse_bool, parse_f64, parse_i64};
use hestia_model::{ColumnType, SchemaMap};

use crate::error::{Result, TransformError};

/// Cast every schema column of `df` to its target type.
///
/// Columns outside the schema are returned untouched and column order is
/// preserved. Nulls stay null. Coercion is idempotent.
///
/// # Errors
///
/// [`TransformError::MissingColumn`] when a schema column is absent and
/// [`TransformError::TypeCoercion`] when a value cannot be converted.
pub fn coerce(df: &DataFrame, schema: &SchemaMap) -> Result<DataFrame> {
    if let Some((name, _)) = schema.iter().find(|(name, _)| df.column(name).is_err()) {
        return Err(TransformError::MissingColumn {
            column: name.to_string(),
            context: "schema column".to_string(),
        });
    }

    let mut out = df.clone();
    for (name, target) in schema.iter() {
        let series = coerce_column(df.column(name)?, name, target)?;
        out.with_column(series)?;
    }
    tracing::debug!(columns = schema.len(), rows = df.height(), "coerced schema columns");
    Ok(out)
}

fn coerce_column(column: &Column, name: &str, target: ColumnType) -> Result<Series> {
    let height = column.len();
    let series = match target {
        ColumnType::String => {
            let mut values: Vec<Option<String>> = Vec::with_capacity(height);
            for idx in 0..height {
                let value = column.get(idx)?;
                values.push((!value.is_null()).then(|| any_to_string(value)));
            }
            Series::new(name.into(), values)
        }
        ColumnType::Integer => {
            let mut values: Vec<Option<i64>> = Vec::with_capacity(height);
            for idx in 0..height {
                let value = column.get(idx)?;
                values.push(convert_value(&value, name, idx, target, to_i64)?);
            }
            Series::new(name.into(), values)
        }
        ColumnType::Float => {
            let mut values: Vec<Option<f64>> = Vec::with_capacity(height);
            for idx in 0..height {
                let value = column.get(idx)?;
                values.push(convert_value(&value, name, idx, target, to_f64)?);
            }
            Series::new(name.into(), values)
        }
        ColumnType::Boolean => {
            let mut values: Vec<Option<bool>> = Vec::with_capacity(height);
            for idx in 0..height {
                let value = column.get(idx)?;
                values.push(convert_value(&value, name, idx, target, to_bool)?);
            }
            Series::new(name.into(), values)
        }
    };
    Ok(series)
}

/// Null passes through; anything else must convert.
fn convert_value<T>(
    value: &AnyValue<'_>,
    column: &str,
    row: usize,
    target: ColumnType,
    convert: fn(&AnyValue<'_>) -> Option<T>,
) -> Result<Option<T>> {
    if value.is_null() {
        return Ok(None);
    }
    match convert(value) {
        Some(converted) => Ok(Some(converted)),
        None => Err(TransformError::TypeCoercion {
            column: column.to_string(),
            row,
            value: any_to_string(value.clone()),
            target,
        }),
    }
}

fn to_i64(value: &AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Int8(v) => Some(i64::from(*v)),
        AnyValue::Int16(v) => Some(i64::from(*v)),
        AnyValue::Int32(v) => Some(i64::from(*v)),
        AnyValue::Int64(v) => Some(*v),
        AnyValue::UInt8(v) => Some(i64::from(*v)),
        AnyValue::UInt16(v) => Some(i64::from(*v)),
        AnyValue::UInt32(v) => Some(i64::from(*v)),
        AnyValue::UInt64(v) => i64::try_from(*v).ok(),
        AnyValue::Float32(v) => whole_f64(f64::from(*v)),
        AnyValue::Float64(v) => whole_f64(*v),
        AnyValue::String(s) => parse_i64(s),
        AnyValue::StringOwned(s) => parse_i64(s),
        _ => None,
    }
}

fn whole_f64(v: f64) -> Option<i64> {
    (v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64).then_some(v as i64)
}

fn to_f64(value: &AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Int8(v) => Some(f64::from(*v)),
        AnyValue::Int16(v) => Some(f64::from(*v)),
        AnyValue::Int32(v) => Some(f64::from(*v)),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::UInt8(v) => Some(f64::from(*v)),
        AnyValue::UInt16(v) => Some(f64::from(*v)),
        AnyValue::UInt32(v) => Some(f64::from(*v)),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Float64(v) => Some(*v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(s),
        _ => None,
    }
}

fn to_bool(value: &AnyValue<'_>) -> Option<bool> {
    match value {
        AnyValue::Boolean(v) => Some(*v),
        AnyValue::String(s) => parse_bool(s),
        AnyValue::StringOwned(s) => parse_bool(s),
        other => match to_i64(other) {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
    }
}
