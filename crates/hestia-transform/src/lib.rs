//! Normalization of flattened Hestia exports.
//!
//! This crate turns one wide, denormalized export table back into one row per
//! record:
//!
//! - **partition**: split the columns into entity groups and drop incomplete rows
//! - **join**: re-join the groups through the configured inner-join sequence
//! - **convert**: partition + join, then restore column order and sort
//! - **coerce**: apply a [`SchemaMap`](hestia_model::SchemaMap) before comparison
//! - **compare**: cell-by-cell comparison of two tables

pub mod coerce;
pub mod compare;
pub mod convert;
pub mod error;
pub mod frame;
pub mod join;
pub mod partition;

pub use coerce::coerce;
pub use compare::{CellMismatch, FrameComparison, check, compare};
pub use convert::{convert, sort_by_key};
pub use error::{Result, TransformError};
pub use join::{inner_join, join_groups};
pub use partition::{SubTable, partition};
