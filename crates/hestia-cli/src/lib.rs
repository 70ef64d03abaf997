//! Library side of the `hestia-convert` command-line tool.

pub mod commands;
pub mod logging;
pub mod types;
