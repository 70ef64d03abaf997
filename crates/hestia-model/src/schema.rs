//! Column type schema applied before comparing two tables.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Target type for a coerced column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Boolean,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial mapping from column name to target type.
///
/// Columns that are not listed are left untouched by coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaMap {
    columns: BTreeMap<String, ColumnType>,
}

impl SchemaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the target type for a column.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.insert(name, column_type);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, column_type: ColumnType) {
        self.columns.insert(name.into(), column_type);
    }

    pub fn get(&self, name: &str) -> Option<ColumnType> {
        self.columns.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate over `(column, type)` pairs in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.columns
            .iter()
            .map(|(name, column_type)| (name.as_str(), *column_type))
    }

    /// Types published for the Hestia cycle, site, impact assessment and
    /// source nodes that appear in a flattened export.
    pub fn hestia() -> Self {
        let mut schema = Self::new();
        for name in [
            "cycle.@id",
            "cycle.name",
            "cycle.description",
            "cycle.endDate",
            "cycle.functionalUnit",
            "cycle.site.@id",
            "cycle.defaultSource.@id",
            "impactAssessment.@id",
            "impactAssessment.name",
            "impactAssessment.endDate",
            "impactAssessment.allocationMethod",
            "impactAssessment.cycle.@id",
            "impactAssessment.country.@id",
            "impactAssessment.country.name",
            "impactAssessment.product.@id",
            "impactAssessment.product.name",
            "impactAssessment.source.@id",
            "site.@id",
            "site.name",
            "site.siteType",
            "site.defaultSource.@id",
            "site.country.@id",
            "site.country.name",
            "source.@id",
            "source.name",
            "source.bibliography.name",
            "source.bibliography.documentDOI",
            "source.bibliography.title",
        ] {
            schema.insert(name, ColumnType::String);
        }
        schema.insert("impactAssessment.functionalUnitQuantity", ColumnType::Integer);
        schema.insert("impactAssessment.systemBoundary", ColumnType::Boolean);
        schema.insert("cycle.products.0.primary", ColumnType::Boolean);

        for idx in 0..4 {
            schema.insert_term(&format!("cycle.inputs.{idx}"));
        }
        for idx in 0..3 {
            let prefix = format!("cycle.emissions.{idx}");
            schema.insert_term(&prefix);
            schema.insert(format!("{prefix}.methodModel.@id"), ColumnType::String);
            schema.insert(format!("{prefix}.methodModel.name"), ColumnType::String);
            schema.insert(format!("{prefix}.methodTier"), ColumnType::String);
        }
        schema.insert_term("cycle.products.0");
        for idx in 0..4 {
            schema.insert_term(&format!("site.measurements.{idx}"));
        }
        schema
    }

    /// Blank-node term columns: `term.@id`, `term.name` and a numeric `value`.
    fn insert_term(&mut self, prefix: &str) {
        self.insert(format!("{prefix}.term.@id"), ColumnType::String);
        self.insert(format!("{prefix}.term.name"), ColumnType::String);
        self.insert(format!("{prefix}.value"), ColumnType::Float);
    }
}

impl FromIterator<(String, ColumnType)> for SchemaMap {
    fn from_iter<I: IntoIterator<Item = (String, ColumnType)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hestia_schema_covers_export_columns() {
        let schema = SchemaMap::hestia();
        assert_eq!(schema.len(), 76);
        assert_eq!(schema.get("cycle.@id"), Some(ColumnType::String));
        assert_eq!(
            schema.get("impactAssessment.functionalUnitQuantity"),
            Some(ColumnType::Integer)
        );
        assert_eq!(schema.get("cycle.inputs.3.value"), Some(ColumnType::Float));
        assert_eq!(
            schema.get("cycle.emissions.2.methodTier"),
            Some(ColumnType::String)
        );
        assert_eq!(schema.get("site.measurements.3.value"), Some(ColumnType::Float));
        assert_eq!(schema.get("cycle.products.0.primary"), Some(ColumnType::Boolean));
        assert_eq!(schema.get("cycle.unknown"), None);
    }

    #[test]
    fn column_type_serializes_lowercase() {
        let json = serde_json::to_string(&ColumnType::Boolean).unwrap();
        assert_eq!(json, "\"boolean\"");
    }
}
