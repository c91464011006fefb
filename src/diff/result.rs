use serde::{Deserialize, Serialize};

use super::options::DiffOptions;
use super::script::EditOperation;

/// Counts derived from an edit script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub additions: usize,
    pub deletions: usize,
    pub unchanged: usize,
    /// Deleted/Added pairs that carry a character-level annotation
    pub modified: usize,
}

impl Statistics {
    /// Tally a script in one pass
    pub fn from_script(script: &[EditOperation]) -> Self {
        let mut stats = Self::default();
        for op in script {
            match op {
                EditOperation::Unchanged { .. } => stats.unchanged += 1,
                EditOperation::Added { inline, .. } => {
                    stats.additions += 1;
                    if inline.is_some() {
                        stats.modified += 1;
                    }
                }
                EditOperation::Deleted { .. } => stats.deletions += 1,
            }
        }
        stats
    }

    pub fn total_changes(&self) -> usize {
        self.additions + self.deletions
    }

    pub fn net_change(&self) -> isize {
        self.additions as isize - self.deletions as isize
    }

    pub fn is_identical(&self) -> bool {
        self.total_changes() == 0
    }

    /// Share of lines left untouched, relative to the longer side
    pub fn similarity(&self) -> f64 {
        let left = self.unchanged + self.deletions;
        let right = self.unchanged + self.additions;
        let longest = left.max(right);
        if longest == 0 {
            1.0
        } else {
            self.unchanged as f64 / longest as f64
        }
    }
}

/// Output of a diff computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub script: Vec<EditOperation>,
    pub stats: Statistics,
    /// Options that produced this result
    pub options: DiffOptions,
}

impl DiffResult {
    pub fn new(script: Vec<EditOperation>, options: DiffOptions) -> Self {
        let stats = Statistics::from_script(&script);
        Self {
            script,
            stats,
            options,
        }
    }

    /// Left-side lines in script order
    pub fn left_lines(&self) -> Vec<&str> {
        self.script.iter().filter_map(EditOperation::left_text).collect()
    }

    /// Right-side lines in script order
    pub fn right_lines(&self) -> Vec<&str> {
        self.script.iter().filter_map(EditOperation::right_text).collect()
    }
}
