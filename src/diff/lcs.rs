//! Dynamic-programming table for the longest common subsequence

use super::cancel::{CancelCheck, NeverCancel};
use super::tokenizer::ComparisonUnit;
use crate::error::DiffError;

/// (m+1) x (n+1) table where cell (i, j) holds the LCS length of
/// `left[..i]` and `right[..j]`. Row 0 and column 0 are zero.
#[derive(Debug, Clone)]
pub struct LcsMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<u32>,
}

impl LcsMatrix {
    /// Build without a cell limit or cancellation
    pub fn build(left: &[ComparisonUnit], right: &[ComparisonUnit]) -> Result<Self, DiffError> {
        Self::build_with(left, right, &NeverCancel, None)
    }

    /// Number of cells for sequences of the given lengths, `None` on overflow
    pub fn cell_count(left_len: usize, right_len: usize) -> Option<usize> {
        left_len.checked_add(1)?.checked_mul(right_len.checked_add(1)?)
    }

    /// Build the table, polling `cancel` once per row.
    ///
    /// The cell count is checked against `max_cells` before anything is
    /// allocated; a count that overflows `usize` is always rejected.
    pub fn build_with(
        left: &[ComparisonUnit],
        right: &[ComparisonUnit],
        cancel: &dyn CancelCheck,
        max_cells: Option<usize>,
    ) -> Result<Self, DiffError> {
        let rows = left.len() + 1;
        let cols = right.len() + 1;
        let limit = max_cells.unwrap_or(usize::MAX);
        match Self::cell_count(left.len(), right.len()) {
            Some(cells) if cells <= limit => {}
            _ => return Err(DiffError::TableTooLarge { rows, cols, limit }),
        }
        let mut cells = vec![0u32; rows * cols];

        for i in 1..rows {
            if cancel.is_cancelled() {
                return Err(DiffError::Cancelled);
            }

            let row = i * cols;
            let prev = (i - 1) * cols;
            for j in 1..cols {
                cells[row + j] = if left[i - 1].matches(&right[j - 1]) {
                    cells[prev + j - 1] + 1
                } else {
                    cells[prev + j].max(cells[row + j - 1])
                };
            }
        }

        Ok(Self { rows, cols, cells })
    }

    pub fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j] as usize
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Length of the longest common subsequence of the full inputs
    pub fn lcs_len(&self) -> usize {
        self.get(self.rows - 1, self.cols - 1)
    }
}
