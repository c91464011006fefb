//! Character-level annotation of replaced lines
//!
//! A `Deleted` line directly followed by an `Added` line is treated as a
//! modification and both get a per-character breakdown. The line-level
//! script itself is never reordered.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cancel::CancelCheck;
use super::lcs::LcsMatrix;
use super::options::DiffOptions;
use super::script::{backtrack_steps, EditOperation, OpKind, Step};
use super::tokenizer::tokenize_chars;
use crate::error::DiffError;

/// One character-level operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "char", rename_all = "snake_case")]
pub enum CharEditOperation {
    Unchanged(char),
    Added(char),
    Deleted(char),
}

impl CharEditOperation {
    pub fn kind(&self) -> OpKind {
        match self {
            CharEditOperation::Unchanged(_) => OpKind::Unchanged,
            CharEditOperation::Added(_) => OpKind::Added,
            CharEditOperation::Deleted(_) => OpKind::Deleted,
        }
    }

    pub fn ch(&self) -> char {
        match self {
            CharEditOperation::Unchanged(c)
            | CharEditOperation::Added(c)
            | CharEditOperation::Deleted(c) => *c,
        }
    }
}

/// Character annotation attached to one side of a modified line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineChanges {
    pub ops: Vec<CharEditOperation>,
}

impl InlineChanges {
    /// Coalesce consecutive characters of the same kind into spans
    pub fn segments(&self) -> Vec<(OpKind, String)> {
        let mut segments: Vec<(OpKind, String)> = Vec::new();
        for op in &self.ops {
            match segments.last_mut() {
                Some((kind, text)) if *kind == op.kind() => text.push(op.ch()),
                _ => segments.push((op.kind(), op.ch().to_string())),
            }
        }
        segments
    }

    /// Number of characters that differ from the paired line
    pub fn changed_chars(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| op.kind() != OpKind::Unchanged)
            .count()
    }
}

/// Largest character table built for one modified pair (about 4 MB of `u32`).
/// Pairs above it keep their line-level classification without annotation.
pub const MAX_INLINE_CELLS: usize = 1_000_000;

/// Align two strings character by character.
///
/// Returns the left annotation (unchanged/deleted) and the right annotation
/// (unchanged/added). Each carries every character of its own side in order.
/// Fails with `TableTooLarge` above [`MAX_INLINE_CELLS`] and with `Cancelled`
/// when `cancel` fires.
pub fn diff_chars(
    left: &str,
    right: &str,
    options: &DiffOptions,
    cancel: &dyn CancelCheck,
) -> Result<(Vec<CharEditOperation>, Vec<CharEditOperation>), DiffError> {
    let left_chars: Vec<char> = left.chars().collect();
    let right_chars: Vec<char> = right.chars().collect();

    match LcsMatrix::cell_count(left_chars.len(), right_chars.len()) {
        Some(cells) if cells <= MAX_INLINE_CELLS => {}
        _ => {
            return Err(DiffError::TableTooLarge {
                rows: left_chars.len() + 1,
                cols: right_chars.len() + 1,
                limit: MAX_INLINE_CELLS,
            })
        }
    }

    let left_units = tokenize_chars(left, options);
    let right_units = tokenize_chars(right, options);
    let matrix = LcsMatrix::build_with(&left_units, &right_units, cancel, Some(MAX_INLINE_CELLS))?;

    let mut left_ops = Vec::with_capacity(left_chars.len());
    let mut right_ops = Vec::with_capacity(right_chars.len());
    for step in backtrack_steps(&matrix, &left_units, &right_units) {
        match step {
            Step::Equal(i, j) => {
                left_ops.push(CharEditOperation::Unchanged(left_chars[i]));
                right_ops.push(CharEditOperation::Unchanged(right_chars[j]));
            }
            Step::Delete(i) => left_ops.push(CharEditOperation::Deleted(left_chars[i])),
            Step::Insert(j) => right_ops.push(CharEditOperation::Added(right_chars[j])),
        }
    }

    Ok((left_ops, right_ops))
}

/// Attach character annotations to adjacent Deleted/Added pairs.
///
/// Only a non-empty `Deleted` immediately followed by a non-empty `Added`
/// qualifies, and each line takes part in at most one pair. A pair too long
/// for [`MAX_INLINE_CELLS`] is consumed but left unannotated. Returns the
/// number of pairs annotated.
pub fn annotate(
    script: &mut [EditOperation],
    options: &DiffOptions,
    cancel: &dyn CancelCheck,
) -> Result<usize, DiffError> {
    let mut pairs = 0;
    let mut idx = 0;

    while idx + 1 < script.len() {
        let (head, tail) = script.split_at_mut(idx + 1);
        match (&mut head[idx], &mut tail[0]) {
            (
                EditOperation::Deleted {
                    left_line,
                    left_text,
                    inline: left_inline,
                },
                EditOperation::Added {
                    right_text,
                    inline: right_inline,
                    ..
                },
            ) if !left_text.is_empty() && !right_text.is_empty() => {
                match diff_chars(left_text, right_text, options, cancel) {
                    Ok((left_ops, right_ops)) => {
                        *left_inline = Some(InlineChanges { ops: left_ops });
                        *right_inline = Some(InlineChanges { ops: right_ops });
                        pairs += 1;
                    }
                    Err(DiffError::TableTooLarge { rows, cols, .. }) => {
                        debug!(line = *left_line, rows, cols, "Skipping intra-line diff for long pair");
                    }
                    Err(err) => return Err(err),
                }
                idx += 2;
            }
            _ => idx += 1,
        }
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::cancel::{CancellationToken, NeverCancel};

    fn deleted(line: usize, text: &str) -> EditOperation {
        EditOperation::Deleted {
            left_line: line,
            left_text: text.to_string(),
            inline: None,
        }
    }

    fn added(line: usize, text: &str) -> EditOperation {
        EditOperation::Added {
            right_line: line,
            right_text: text.to_string(),
            inline: None,
        }
    }

    #[test]
    fn test_diff_chars_marks_changed_characters() {
        let (left, right) = diff_chars("line2", "lineX", &DiffOptions::default(), &NeverCancel).unwrap();

        assert_eq!(
            left,
            vec![
                CharEditOperation::Unchanged('l'),
                CharEditOperation::Unchanged('i'),
                CharEditOperation::Unchanged('n'),
                CharEditOperation::Unchanged('e'),
                CharEditOperation::Deleted('2'),
            ]
        );
        assert_eq!(
            right,
            vec![
                CharEditOperation::Unchanged('l'),
                CharEditOperation::Unchanged('i'),
                CharEditOperation::Unchanged('n'),
                CharEditOperation::Unchanged('e'),
                CharEditOperation::Added('X'),
            ]
        );
    }

    #[test]
    fn test_diff_chars_preserves_original_case() {
        let options = DiffOptions::new().case_sensitive(false);
        let (left, right) = diff_chars("Hello", "hello!", &options, &NeverCancel).unwrap();

        assert_eq!(left[0], CharEditOperation::Unchanged('H'));
        assert_eq!(right[0], CharEditOperation::Unchanged('h'));
        assert_eq!(right.last(), Some(&CharEditOperation::Added('!')));
    }

    #[test]
    fn test_diff_chars_multibyte() {
        let (left, right) = diff_chars("café", "cafe", &DiffOptions::default(), &NeverCancel).unwrap();
        assert_eq!(left.last(), Some(&CharEditOperation::Deleted('é')));
        assert_eq!(right.last(), Some(&CharEditOperation::Added('e')));
    }

    #[test]
    fn test_segments() {
        let (left, _) = diff_chars("line2", "lineX", &DiffOptions::default(), &NeverCancel).unwrap();
        let changes = InlineChanges { ops: left };

        assert_eq!(
            changes.segments(),
            vec![
                (OpKind::Unchanged, "line".to_string()),
                (OpKind::Deleted, "2".to_string()),
            ]
        );
        assert_eq!(changes.changed_chars(), 1);
    }

    #[test]
    fn test_annotate_adjacent_pair() {
        let mut script = vec![deleted(2, "line2"), added(2, "lineX")];
        let pairs = annotate(&mut script, &DiffOptions::default(), &NeverCancel).unwrap();

        assert_eq!(pairs, 1);
        assert!(script[0].inline().is_some());
        assert!(script[1].inline().is_some());
    }

    #[test]
    fn test_annotate_only_adjacent_pair_in_block() {
        let mut script = vec![
            deleted(1, "alpha"),
            deleted(2, "beta"),
            added(1, "gamma"),
            added(2, "delta"),
            added(3, "epsilon"),
        ];
        let pairs = annotate(&mut script, &DiffOptions::default(), &NeverCancel).unwrap();

        assert_eq!(pairs, 1);
        assert!(script[0].inline().is_none());
        assert!(script[1].inline().is_some());
        assert!(script[2].inline().is_some());
        assert!(script[3].inline().is_none());
        assert!(script[4].inline().is_none());
    }

    #[test]
    fn test_annotate_skips_empty_lines() {
        let mut script = vec![deleted(1, ""), added(1, "text")];
        assert_eq!(annotate(&mut script, &DiffOptions::default(), &NeverCancel), Ok(0));
        assert!(script.iter().all(|op| op.inline().is_none()));
    }

    #[test]
    fn test_annotate_ignores_added_then_deleted() {
        let mut script = vec![added(1, "new"), deleted(1, "old")];
        assert_eq!(annotate(&mut script, &DiffOptions::default(), &NeverCancel), Ok(0));
    }

    #[test]
    fn test_long_pair_is_left_unannotated() {
        let long_left = "a".repeat(2_000);
        let long_right = "b".repeat(2_000);
        let mut script = vec![
            deleted(1, &long_left),
            added(1, &long_right),
            deleted(2, "line2"),
            added(2, "lineX"),
        ];

        let pairs = annotate(&mut script, &DiffOptions::default(), &NeverCancel).unwrap();

        assert_eq!(pairs, 1);
        assert!(script[0].inline().is_none());
        assert!(script[1].inline().is_none());
        assert!(script[2].inline().is_some());
        assert!(script[3].inline().is_some());
    }

    #[test]
    fn test_diff_chars_rejects_oversized_table() {
        let err = diff_chars(&"x".repeat(1_000), &"y".repeat(1_000), &DiffOptions::default(), &NeverCancel)
            .unwrap_err();
        assert_eq!(
            err,
            DiffError::TableTooLarge {
                rows: 1_001,
                cols: 1_001,
                limit: MAX_INLINE_CELLS,
            }
        );
    }

    #[test]
    fn test_annotate_stops_when_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let mut script = vec![deleted(1, "line2"), added(1, "lineX")];

        let result = annotate(&mut script, &DiffOptions::default(), &token);

        assert_eq!(result, Err(DiffError::Cancelled));
        assert!(script[0].inline().is_none());
    }
}
