//! CSV file reading into string-typed DataFrames.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};

use crate::error::{IngestError, Result};

use super::header::parse_header_line;

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Reads the header row of a CSV file.
pub fn read_csv_headers(path: &Path) -> Result<Vec<String>> {
    let file = open_file(path)?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    let bytes = reader
        .read_line(&mut line)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    if bytes == 0 || line.trim().is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let columns = parse_header_line(&line);
    if columns.iter().any(|name| name.trim().is_empty()) {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }
    Ok(columns)
}

/// Reads a CSV file into a Polars DataFrame with every column as a string.
///
/// Schema inference is disabled: export identifiers and values stay exactly
/// as written. Empty cells become nulls.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    let headers = read_csv_headers(path)?;

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // Keep the header names exactly as parsed (a leading BOM must not leak
    // into the first column name).
    let first = df.get_column_names().first().map(|name| name.to_string());
    if let (Some(first), Some(expected)) = (first, headers.first())
        && &first != expected
    {
        df.rename(&first, expected.as_str().into())?;
    }

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded CSV table"
    );
    Ok(df)
}
