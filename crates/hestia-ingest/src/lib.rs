//! CSV ingestion for Hestia exports.
//!
//! Exports are read into Polars DataFrames with every column kept as text:
//! typing only happens later, through an explicit schema, so the raw values
//! used as join keys are exactly what the provider wrote.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use hestia_ingest::{read_csv_table, write_csv_table};
//!
//! let mut df = read_csv_table(Path::new("test/input.csv"))?;
//! write_csv_table(&mut df, Path::new("test/copy.csv"))?;
//! ```

mod csv;
mod error;
mod values;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading / Writing ===
pub use csv::{read_csv_headers, read_csv_table, write_csv_table};

// === Cell Values ===
pub use values::{any_to_string, format_numeric, is_missing, parse_bool, parse_f64, parse_i64};
