//! Data model for normalizing Hestia CSV exports.
//!
//! The conversion is driven entirely by a [`ConversionConfig`]: which columns
//! belong to which entity group, how the groups are joined back together, the
//! column used to order the result, and the [`SchemaMap`] used to type
//! columns before two tables are compared.

pub mod config;
pub mod error;
pub mod schema;

pub use config::{
    ConversionConfig, DEFAULT_MISSING_VALUE, GroupFilter, JoinSource, JoinStep,
    MissingGroupPolicy,
};
pub use error::{ConfigError, Result};
pub use schema::{ColumnType, SchemaMap};
