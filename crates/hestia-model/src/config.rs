//! Conversion configuration: column groups, join sequence and ordering.
//!
//! A [`ConversionConfig`] is the single input, besides the table itself, that
//! drives a conversion. The built-in [`ConversionConfig::hestia`] tables
//! reproduce the layout of a Hestia flattened export; any other layout can be
//! described in JSON and loaded with [`ConversionConfig::load`].

use std::collections::BTreeSet;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::schema::SchemaMap;

/// Literal used by the data provider for a missing field.
pub const DEFAULT_MISSING_VALUE: &str = "-";

/// Column group: every column whose name matches `pattern` belongs to `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFilter {
    pub name: String,
    /// Regular expression matched against column names.
    pub pattern: String,
}

impl GroupFilter {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    /// Group covering every column that starts with `prefix` followed by a dot.
    pub fn prefix(name: impl Into<String>, prefix: &str) -> Self {
        Self::new(name, format!("^{}\\.", regex::escape(prefix)))
    }

    /// Compile the column-name pattern.
    pub fn compile(&self) -> Result<Regex> {
        Regex::new(&self.pattern).map_err(|source| ConfigError::InvalidPattern {
            group: self.name.clone(),
            source,
        })
    }
}

/// Left-hand input of a join step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinSource {
    /// A cleaned sub-table.
    Group(String),
    /// The result of the previous join step.
    Merged,
}

impl JoinSource {
    pub fn group_name(&self) -> Option<&str> {
        match self {
            Self::Group(name) => Some(name),
            Self::Merged => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Group(name) => name,
            Self::Merged => "merged",
        }
    }
}

/// One inner join in the join sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStep {
    pub left: JoinSource,
    pub left_key: String,
    /// Name of the group joined onto the left side.
    pub right: String,
    pub right_key: String,
}

impl JoinStep {
    /// Join two groups.
    pub fn groups(
        left: impl Into<String>,
        left_key: impl Into<String>,
        right: impl Into<String>,
        right_key: impl Into<String>,
    ) -> Self {
        Self {
            left: JoinSource::Group(left.into()),
            left_key: left_key.into(),
            right: right.into(),
            right_key: right_key.into(),
        }
    }

    /// Join a group onto the running merged result.
    pub fn merged(
        left_key: impl Into<String>,
        right: impl Into<String>,
        right_key: impl Into<String>,
    ) -> Self {
        Self {
            left: JoinSource::Merged,
            left_key: left_key.into(),
            right: right.into(),
            right_key: right_key.into(),
        }
    }

    /// Names of the groups this step reads.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.left
            .group_name()
            .into_iter()
            .chain(std::iter::once(self.right.as_str()))
    }
}

/// What to do when a join step names a group that has no columns in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingGroupPolicy {
    /// Fail the conversion.
    #[default]
    Error,
    /// Skip the join steps that need the absent group.
    Skip,
}

/// Full description of a conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Column groups, in declaration order.
    pub groups: Vec<GroupFilter>,
    /// Join steps, executed in order.
    pub joins: Vec<JoinStep>,
    /// Column the converted table is sorted by.
    pub sort_key: String,
    /// Cell value treated as missing, in addition to empty cells.
    #[serde(default = "default_missing_value")]
    pub missing_value: String,
    #[serde(default)]
    pub missing_groups: MissingGroupPolicy,
    /// Types applied before comparing tables.
    #[serde(default)]
    pub schema: SchemaMap,
}

fn default_missing_value() -> String {
    DEFAULT_MISSING_VALUE.to_string()
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self::hestia()
    }
}

impl ConversionConfig {
    /// Tables for a Hestia export holding cycle, site, impact assessment and
    /// source nodes.
    pub fn hestia() -> Self {
        Self {
            groups: vec![
                GroupFilter::prefix("cycle", "cycle"),
                GroupFilter::prefix("site", "site"),
                GroupFilter::prefix("impactAssessment", "impactAssessment"),
                GroupFilter::prefix("source", "source"),
            ],
            joins: vec![
                JoinStep::groups("site", "site.@id", "cycle", "cycle.site.@id"),
                JoinStep::merged("cycle.@id", "impactAssessment", "impactAssessment.cycle.@id"),
                JoinStep::merged("impactAssessment.source.@id", "source", "source.@id"),
            ],
            sort_key: "cycle.@id".to_string(),
            missing_value: default_missing_value(),
            missing_groups: MissingGroupPolicy::Error,
            schema: SchemaMap::hestia(),
        }
    }

    #[must_use]
    pub fn with_missing_groups(mut self, policy: MissingGroupPolicy) -> Self {
        self.missing_groups = policy;
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: SchemaMap) -> Self {
        self.schema = schema;
        self
    }

    pub fn group(&self, name: &str) -> Option<&GroupFilter> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Parse a JSON configuration and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the tables are internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(ConfigError::NoGroups);
        }
        let mut names = BTreeSet::new();
        for group in &self.groups {
            if group.name.trim().is_empty() {
                return Err(ConfigError::EmptyField {
                    field: "groups.name",
                });
            }
            if !names.insert(group.name.as_str()) {
                return Err(ConfigError::DuplicateGroup {
                    name: group.name.clone(),
                });
            }
            group.compile()?;
        }

        if self.joins.is_empty() {
            return Err(ConfigError::NoJoins);
        }
        for (idx, step) in self.joins.iter().enumerate() {
            let number = idx + 1;
            if idx == 0 && step.left == JoinSource::Merged {
                return Err(ConfigError::MergedBeforeFirstJoin);
            }
            for group in step.group_names() {
                if !names.contains(group) {
                    return Err(ConfigError::UnknownGroup {
                        step: number,
                        group: group.to_string(),
                    });
                }
            }
            if step.left_key.trim().is_empty() || step.right_key.trim().is_empty() {
                return Err(ConfigError::EmptyField {
                    field: "joins.key",
                });
            }
        }

        if self.sort_key.trim().is_empty() {
            return Err(ConfigError::EmptyField { field: "sort_key" });
        }
        if self.missing_value.is_empty() {
            return Err(ConfigError::EmptyField {
                field: "missing_value",
            });
        }
        Ok(())
    }
}
