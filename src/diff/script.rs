//! Edit script reconstruction by backtracking the LCS table

use serde::{Deserialize, Serialize};

use super::inline::InlineChanges;
use super::lcs::LcsMatrix;
use super::tokenizer::ComparisonUnit;

/// Kind of a line or character operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Unchanged,
    Added,
    Deleted,
}

/// One line-level operation. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditOperation {
    Unchanged {
        left_line: usize,
        right_line: usize,
        left_text: String,
        right_text: String,
    },
    Added {
        right_line: usize,
        right_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inline: Option<InlineChanges>,
    },
    Deleted {
        left_line: usize,
        left_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inline: Option<InlineChanges>,
    },
}

impl EditOperation {
    pub fn kind(&self) -> OpKind {
        match self {
            EditOperation::Unchanged { .. } => OpKind::Unchanged,
            EditOperation::Added { .. } => OpKind::Added,
            EditOperation::Deleted { .. } => OpKind::Deleted,
        }
    }

    pub fn left_line(&self) -> Option<usize> {
        match self {
            EditOperation::Unchanged { left_line, .. } | EditOperation::Deleted { left_line, .. } => {
                Some(*left_line)
            }
            EditOperation::Added { .. } => None,
        }
    }

    pub fn right_line(&self) -> Option<usize> {
        match self {
            EditOperation::Unchanged { right_line, .. } | EditOperation::Added { right_line, .. } => {
                Some(*right_line)
            }
            EditOperation::Deleted { .. } => None,
        }
    }

    /// Text this operation contributes to the left input
    pub fn left_text(&self) -> Option<&str> {
        match self {
            EditOperation::Unchanged { left_text, .. } | EditOperation::Deleted { left_text, .. } => {
                Some(left_text)
            }
            EditOperation::Added { .. } => None,
        }
    }

    /// Text this operation contributes to the right input
    pub fn right_text(&self) -> Option<&str> {
        match self {
            EditOperation::Unchanged { right_text, .. } | EditOperation::Added { right_text, .. } => {
                Some(right_text)
            }
            EditOperation::Deleted { .. } => None,
        }
    }

    pub fn inline(&self) -> Option<&InlineChanges> {
        match self {
            EditOperation::Added { inline, .. } | EditOperation::Deleted { inline, .. } => {
                inline.as_ref()
            }
            EditOperation::Unchanged { .. } => None,
        }
    }
}

/// Index-level step of an alignment, 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Equal(usize, usize),
    Insert(usize),
    Delete(usize),
}

/// Walk the table from (m, n) back to (0, 0) and return steps in forward order.
///
/// A match always takes the diagonal. Otherwise the right side is consumed
/// first unless that move is strictly worse, so within a changed block all
/// deletions precede the additions.
pub fn backtrack_steps(
    matrix: &LcsMatrix,
    left: &[ComparisonUnit],
    right: &[ComparisonUnit],
) -> Vec<Step> {
    let mut steps = Vec::with_capacity(left.len() + right.len());
    let mut i = left.len();
    let mut j = right.len();

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && left[i - 1].matches(&right[j - 1]) {
            steps.push(Step::Equal(i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || matrix.get(i, j - 1) >= matrix.get(i - 1, j)) {
            steps.push(Step::Insert(j - 1));
            j -= 1;
        } else {
            steps.push(Step::Delete(i - 1));
            i -= 1;
        }
    }

    steps.reverse();
    steps
}

/// Reconstruct the line-level edit script
pub fn backtrack(
    matrix: &LcsMatrix,
    left: &[ComparisonUnit],
    right: &[ComparisonUnit],
) -> Vec<EditOperation> {
    backtrack_steps(matrix, left, right)
        .into_iter()
        .map(|step| match step {
            Step::Equal(i, j) => EditOperation::Unchanged {
                left_line: left[i].position,
                right_line: right[j].position,
                left_text: left[i].original.clone(),
                right_text: right[j].original.clone(),
            },
            Step::Insert(j) => EditOperation::Added {
                right_line: right[j].position,
                right_text: right[j].original.clone(),
                inline: None,
            },
            Step::Delete(i) => EditOperation::Deleted {
                left_line: left[i].position,
                left_text: left[i].original.clone(),
                inline: None,
            },
        })
        .collect()
}
