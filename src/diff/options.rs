use serde::{Deserialize, Serialize};

use crate::error::DiffError;

/// Default ceiling on the number of lines accepted per side
pub const DEFAULT_MAX_UNITS: usize = 50_000;

/// Default ceiling on LCS table cells for the line pass (400 MB of `u32`)
pub const DEFAULT_MAX_CELLS: usize = 100_000_000;

/// Normalization and size options for a diff computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    /// Compare lines with their original casing
    pub case_sensitive: bool,
    /// Collapse whitespace runs and trim line ends before comparing
    pub ignore_whitespace: bool,
    /// Maximum number of lines per side, `None` for unlimited
    pub max_units: Option<usize>,
    /// Maximum number of cells in the line-level LCS table, `None` for unlimited
    #[serde(default)]
    pub max_cells: Option<usize>,
}

impl DiffOptions {
    pub fn new() -> Self {
        Self {
            case_sensitive: true,
            ignore_whitespace: false,
            max_units: Some(DEFAULT_MAX_UNITS),
            max_cells: Some(DEFAULT_MAX_CELLS),
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn ignore_whitespace(mut self, ignore_whitespace: bool) -> Self {
        self.ignore_whitespace = ignore_whitespace;
        self
    }

    pub fn max_units(mut self, max_units: Option<usize>) -> Self {
        self.max_units = max_units;
        self
    }

    pub fn max_cells(mut self, max_cells: Option<usize>) -> Self {
        self.max_cells = max_cells;
        self
    }

    /// Reject option combinations that cannot produce a diff
    pub fn validate(&self) -> Result<(), DiffError> {
        if self.max_units == Some(0) {
            return Err(DiffError::InvalidOptions(
                "max_units must be greater than 0".to_string(),
            ));
        }
        if self.max_cells == Some(0) {
            return Err(DiffError::InvalidOptions(
                "max_cells must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Convert a signed ceiling coming from user input
    pub fn limit_from_signed(name: &str, value: i64) -> Result<usize, DiffError> {
        if value <= 0 {
            return Err(DiffError::InvalidOptions(format!(
                "{} must be greater than 0, got {}",
                name, value
            )));
        }
        usize::try_from(value).map_err(|_| {
            DiffError::InvalidOptions(format!("{} {} does not fit this platform", name, value))
        })
    }
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self::new()
    }
}
