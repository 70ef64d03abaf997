//! CSV reading and writing.

mod header;
mod reader;
mod writer;

pub use reader::{read_csv_headers, read_csv_table};
pub use writer::write_csv_table;
