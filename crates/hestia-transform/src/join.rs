//! Inner joins that rebuild records from the partitioned groups.

use std::collections::HashMap;

use polars::prelude::DataFrame;
use tracing::{debug, warn};

use hestia_model::{ConversionConfig, JoinSource, JoinStep, MissingGroupPolicy};

use crate::error::{Result, TransformError};
use crate::frame::{column_text_values, has_column, take_rows};
use crate::partition::SubTable;

/// Hash inner join of `left` and `right` on `left_key = right_key`.
///
/// Keys are compared by exact text value and null keys never match. A key
/// repeated on either side yields every pairing. Output rows follow the left
/// table's order (then the right table's order among matches) and the columns
/// are the left columns followed by the right columns.
pub fn inner_join(
    left: &DataFrame,
    right: &DataFrame,
    left_key: &str,
    right_key: &str,
) -> Result<DataFrame> {
    let left_keys = column_text_values(left, left_key, "left join key")?;
    let right_keys = column_text_values(right, right_key, "right join key")?;

    let mut index: HashMap<&str, Vec<u32>> = HashMap::with_capacity(right_keys.len());
    for (row, key) in right_keys.iter().enumerate() {
        if let Some(key) = key {
            index.entry(key.as_str()).or_default().push(row as u32);
        }
    }

    let mut left_rows = Vec::new();
    let mut right_rows = Vec::new();
    for (row, key) in left_keys.iter().enumerate() {
        let Some(key) = key else {
            continue;
        };
        if let Some(matches) = index.get(key.as_str()) {
            for &matched in matches {
                left_rows.push(row as u32);
                right_rows.push(matched);
            }
        }
    }

    let left_part = take_rows(left, left_rows)?;
    let right_part = take_rows(right, right_rows)?;
    Ok(left_part.hstack(right_part.get_columns())?)
}

/// Execute the configured join sequence over the partitioned groups.
///
/// Each step's result becomes the merged result. Under
/// [`MissingGroupPolicy::Skip`] a step whose side is absent is skipped, and
/// the side that is present is carried forward when nothing has been merged
/// yet.
pub fn join_groups(groups: &[SubTable], config: &ConversionConfig) -> Result<DataFrame> {
    let mut merged: Option<DataFrame> = None;

    for (idx, step) in config.joins.iter().enumerate() {
        let number = idx + 1;
        let right = resolve_group(groups, &step.right, config.missing_groups)?;
        let left = match &step.left {
            JoinSource::Group(name) => resolve_group(groups, name, config.missing_groups)?
                .map(|table| table.frame.clone()),
            JoinSource::Merged => merged.take(),
        };

        match (left, right) {
            (Some(left), Some(right)) => {
                check_duplicate_columns(&left, &right.frame, number)?;
                let joined = inner_join(&left, &right.frame, &step.left_key, &step.right_key)?;
                if joined.height() == 0 {
                    return Err(TransformError::EmptyJoin {
                        step: number,
                        left_key: step.left_key.clone(),
                        right_key: step.right_key.clone(),
                    });
                }
                log_step(step, number, left.height(), right.record_count(), joined.height());
                merged = Some(joined);
            }
            (Some(left), None) => {
                warn!(step = number, group = %step.right, "skipping join step: group not in input");
                if merged.is_none() {
                    merged = Some(left);
                }
            }
            (None, Some(right)) => {
                warn!(
                    step = number,
                    left = %step.left.label(),
                    "skipping join step: left side not available"
                );
                if merged.is_none() {
                    merged = Some(right.frame.clone());
                }
            }
            (None, None) => {
                warn!(step = number, "skipping join step: neither side in input");
            }
        }
    }

    merged.ok_or(TransformError::NothingJoined)
}

/// Look up a group, applying the missing-group policy.
fn resolve_group<'a>(
    groups: &'a [SubTable],
    name: &str,
    policy: MissingGroupPolicy,
) -> Result<Option<&'a SubTable>> {
    match groups.iter().find(|table| table.name == name) {
        Some(table) if table.record_count() == 0 => Err(TransformError::MissingGroup {
            group: name.to_string(),
            reason: "no complete rows",
        }),
        Some(table) => Ok(Some(table)),
        None => match policy {
            MissingGroupPolicy::Error => Err(TransformError::MissingGroup {
                group: name.to_string(),
                reason: "no matching columns in input",
            }),
            MissingGroupPolicy::Skip => Ok(None),
        },
    }
}

fn check_duplicate_columns(left: &DataFrame, right: &DataFrame, step: usize) -> Result<()> {
    for name in right.get_column_names() {
        if has_column(left, name.as_str()) {
            return Err(TransformError::DuplicateColumn {
                step,
                column: name.to_string(),
            });
        }
    }
    Ok(())
}

fn log_step(step: &JoinStep, number: usize, left_rows: usize, right_rows: usize, rows: usize) {
    debug!(
        step = number,
        left = %step.left.label(),
        right = %step.right,
        left_key = %step.left_key,
        right_key = %step.right_key,
        left_rows,
        right_rows,
        rows,
        "joined"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::column_names;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn frame(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
        DataFrame::new(
            columns
                .into_iter()
                .map(|(name, values)| Series::new(name.into(), values).into_column())
                .collect(),
        )
        .unwrap()
    }

    fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        column_text_values(df, name, "test").unwrap()
    }

    #[test]
    fn inner_join_keeps_matching_rows_only() {
        let sites = frame(vec![("site.@id", vec!["s1", "s2"]), ("site.name", vec!["A", "B"])]);
        let cycles = frame(vec![
            ("cycle.@id", vec!["c1", "c2", "c3"]),
            ("cycle.site.@id", vec!["s2", "s9", "s1"]),
        ]);

        let joined = inner_join(&sites, &cycles, "site.@id", "cycle.site.@id").unwrap();

        assert_eq!(
            column_names(&joined),
            vec!["site.@id", "site.name", "cycle.@id", "cycle.site.@id"]
        );
        assert_eq!(joined.height(), 2);
        assert_eq!(
            strings(&joined, "cycle.@id"),
            vec![Some("c3".to_string()), Some("c1".to_string())]
        );
        assert_eq!(
            strings(&joined, "site.name"),
            vec![Some("A".to_string()), Some("B".to_string())]
        );
    }

    #[test]
    fn repeated_keys_produce_cross_product() {
        let left = frame(vec![("l.key", vec!["k", "k"]), ("l.v", vec!["1", "2"])]);
        let right = frame(vec![("r.key", vec!["k", "k", "x"]), ("r.v", vec!["a", "b", "c"])]);

        let joined = inner_join(&left, &right, "l.key", "r.key").unwrap();

        assert_eq!(joined.height(), 4);
        let pairs: Vec<(String, String)> = strings(&joined, "l.v")
            .into_iter()
            .zip(strings(&joined, "r.v"))
            .map(|(l, r)| (l.unwrap(), r.unwrap()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("1".to_string(), "a".to_string()),
                ("1".to_string(), "b".to_string()),
                ("2".to_string(), "a".to_string()),
                ("2".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn null_keys_never_match() {
        let left = DataFrame::new(vec![
            Series::new("l.key".into(), vec![None::<&str>, Some("k")]).into_column(),
        ])
        .unwrap();
        let right = DataFrame::new(vec![
            Series::new("r.key".into(), vec![None::<&str>, Some("k")]).into_column(),
        ])
        .unwrap();

        let joined = inner_join(&left, &right, "l.key", "r.key").unwrap();

        assert_eq!(joined.height(), 1);
    }

    #[test]
    fn missing_key_column_is_reported() {
        let left = frame(vec![("l.key", vec!["k"])]);
        let right = frame(vec![("r.key", vec!["k"])]);

        let result = inner_join(&left, &right, "l.key", "r.id");

        assert!(matches!(
            result,
            Err(TransformError::MissingColumn { column, .. }) if column == "r.id"
        ));
    }

    #[test]
    fn skip_policy_carries_available_group_forward() {
        let groups = vec![
            SubTable {
                name: "cycle".to_string(),
                frame: frame(vec![("cycle.@id", vec!["c1", "c2"])]),
                dropped_rows: 0,
            },
            SubTable {
                name: "impactAssessment".to_string(),
                frame: frame(vec![("impactAssessment.cycle.@id", vec!["c2"])]),
                dropped_rows: 0,
            },
        ];
        let config = ConversionConfig::hestia().with_missing_groups(MissingGroupPolicy::Skip);

        let merged = join_groups(&groups, &config).unwrap();

        assert_eq!(merged.height(), 1);
        assert_eq!(
            column_names(&merged),
            vec!["cycle.@id", "impactAssessment.cycle.@id"]
        );
        assert_eq!(strings(&merged, "cycle.@id"), vec![Some("c2".to_string())]);
    }

    #[test]
    fn skip_policy_with_nothing_available_fails() {
        let config = ConversionConfig::hestia().with_missing_groups(MissingGroupPolicy::Skip);
        let result = join_groups(&[], &config);
        assert!(matches!(result, Err(TransformError::NothingJoined)));
    }

    #[test]
    fn error_policy_reports_absent_group() {
        let groups = vec![SubTable {
            name: "cycle".to_string(),
            frame: frame(vec![("cycle.@id", vec!["c1"])]),
            dropped_rows: 0,
        }];
        let result = join_groups(&groups, &ConversionConfig::hestia());
        assert!(matches!(
            result,
            Err(TransformError::MissingGroup { group, .. }) if group == "site"
        ));
    }

    #[test]
    fn empty_group_is_always_an_error() {
        let groups = vec![
            SubTable {
                name: "site".to_string(),
                frame: frame(vec![("site.@id", Vec::<&str>::new())]),
                dropped_rows: 2,
            },
            SubTable {
                name: "cycle".to_string(),
                frame: frame(vec![("cycle.site.@id", vec!["s1"])]),
                dropped_rows: 0,
            },
        ];
        let config = ConversionConfig::hestia().with_missing_groups(MissingGroupPolicy::Skip);

        let result = join_groups(&groups, &config);

        assert!(matches!(
            result,
            Err(TransformError::MissingGroup { group, reason: "no complete rows" }) if group == "site"
        ));
    }

    #[test]
    fn empty_join_is_an_error() {
        let groups = vec![
            SubTable {
                name: "site".to_string(),
                frame: frame(vec![("site.@id", vec!["s1"])]),
                dropped_rows: 0,
            },
            SubTable {
                name: "cycle".to_string(),
                frame: frame(vec![("cycle.site.@id", vec!["s2"])]),
                dropped_rows: 0,
            },
        ];
        let mut config = ConversionConfig::hestia();
        config.joins.truncate(1);

        let result = join_groups(&groups, &config);

        assert!(matches!(result, Err(TransformError::EmptyJoin { step: 1, .. })));
    }
}
