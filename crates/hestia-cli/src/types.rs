use std::path::PathBuf;

use hestia_transform::FrameComparison;

/// Per-group partition counts reported after a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub name: String,
    pub columns: usize,
    pub records: usize,
    pub dropped_rows: usize,
}

#[derive(Debug)]
pub struct ConvertResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_rows: usize,
    pub output_rows: usize,
    pub columns: usize,
    pub groups: Vec<GroupSummary>,
}

#[derive(Debug)]
pub struct CompareResult {
    pub actual: PathBuf,
    pub expected: PathBuf,
    pub comparison: FrameComparison,
}

impl CompareResult {
    pub fn is_equal(&self) -> bool {
        self.comparison.is_equal()
    }
}
