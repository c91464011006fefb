//! Error types for diff computation

use std::fmt;
use thiserror::Error;

/// Which input a size violation was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("{side} input has {units} lines, exceeding the limit of {limit}")]
    InputTooLarge { side: Side, units: usize, limit: usize },

    #[error("comparison table of {rows}x{cols} cells exceeds the limit of {limit} cells")]
    TableTooLarge { rows: usize, cols: usize, limit: usize },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Diff computation was cancelled")]
    Cancelled,
}
