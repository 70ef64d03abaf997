//! Column-group partitioning of a wide export table.
//!
//! Every group selects the columns whose names match its pattern and keeps
//! only the rows that are complete for those columns. A flattened export
//! stores one entity per row and fills the columns of other entities with
//! the missing-value sentinel, so this recovers each entity table.

use std::collections::BTreeMap;

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tracing::debug;

use hestia_ingest::is_missing;
use hestia_model::ConversionConfig;

use crate::error::{Result, TransformError};
use crate::frame::column_names;

/// The cleaned columns of one entity group.
#[derive(Debug, Clone)]
pub struct SubTable {
    pub name: String,
    pub frame: DataFrame,
    /// Rows removed because at least one group column was missing.
    pub dropped_rows: usize,
}

impl SubTable {
    pub fn record_count(&self) -> usize {
        self.frame.height()
    }
}

/// Split `df` into one [`SubTable`] per configured group.
///
/// Groups without any matching column are omitted so that sparse exports can
/// still be partitioned; whether that is acceptable is decided by the join
/// stage.
pub fn partition(df: &DataFrame, config: &ConversionConfig) -> Result<Vec<SubTable>> {
    let names = column_names(df);
    let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
    let mut tables = Vec::with_capacity(config.groups.len());

    for group in &config.groups {
        let pattern = group.compile()?;
        let mut selected = Vec::new();
        for name in &names {
            if !pattern.is_match(name) {
                continue;
            }
            if let Some(first) = owners.insert(name.as_str(), group.name.as_str()) {
                return Err(TransformError::OverlappingGroups {
                    column: name.clone(),
                    first: first.to_string(),
                    second: group.name.clone(),
                });
            }
            selected.push(name.clone());
        }

        if selected.is_empty() {
            debug!(group = %group.name, "no columns match group pattern");
            continue;
        }

        let (frame, dropped_rows) =
            drop_incomplete_rows(&df.select(selected)?, &config.missing_value)?;
        debug!(
            group = %group.name,
            columns = frame.width(),
            rows = frame.height(),
            dropped_rows,
            "partitioned group"
        );
        tables.push(SubTable {
            name: group.name.clone(),
            frame,
            dropped_rows,
        });
    }

    Ok(tables)
}

/// Remove every row that holds a null, blank or sentinel cell.
fn drop_incomplete_rows(df: &DataFrame, sentinel: &str) -> Result<(DataFrame, usize)> {
    let mut keep = vec![true; df.height()];
    for column in df.get_columns() {
        for (idx, flag) in keep.iter_mut().enumerate() {
            if *flag && is_missing(&column.get(idx)?, sentinel) {
                *flag = false;
            }
        }
    }
    let dropped = keep.iter().filter(|flag| !**flag).count();
    let mask = BooleanChunked::from_slice("complete".into(), &keep);
    Ok((df.filter(&mask)?, dropped))
}
