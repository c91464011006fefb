use tracing::{debug, warn};

use super::cancel::{CancelCheck, CancellationToken, NeverCancel};
use super::inline::annotate;
use super::lcs::LcsMatrix;
use super::options::DiffOptions;
use super::result::DiffResult;
use super::script::backtrack;
use super::tokenizer::{tokenize_lines, ComparisonUnit};
use crate::error::{DiffError, Side};

/// Runs the full pipeline: tokenize, build the table, backtrack, annotate
#[derive(Debug, Clone, Default)]
pub struct DiffGenerator {
    options: DiffOptions,
    cancel: Option<CancellationToken>,
}

impl DiffGenerator {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            cancel: None,
        }
    }

    /// Abort the line and character passes once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compare `left` against `right`
    pub fn generate(&self, left: &str, right: &str) -> Result<DiffResult, DiffError> {
        match &self.cancel {
            Some(token) => self.generate_with(left, right, token),
            None => self.generate_with(left, right, &NeverCancel),
        }
    }

    /// Compare with a caller-supplied cancellation check
    pub fn generate_with(
        &self,
        left: &str,
        right: &str,
        cancel: &dyn CancelCheck,
    ) -> Result<DiffResult, DiffError> {
        self.options.validate()?;

        self.check_size(Side::Left, unit_count(left))?;
        self.check_size(Side::Right, unit_count(right))?;

        let left_units = self.units(left);
        let right_units = self.units(right);
        debug!(
            left = left_units.len(),
            right = right_units.len(),
            "Building LCS table"
        );

        let matrix = LcsMatrix::build_with(&left_units, &right_units, cancel, self.options.max_cells)
            .map_err(|err| {
                if let DiffError::TableTooLarge { rows, cols, limit } = &err {
                    warn!(rows, cols, limit, "LCS table exceeds cell budget");
                }
                err
            })?;
        let mut script = backtrack(&matrix, &left_units, &right_units);
        debug!(lcs = matrix.lcs_len(), ops = script.len(), "Reconstructed edit script");
        drop(matrix);

        let pairs = annotate(&mut script, &self.options, cancel)?;
        debug!(pairs, "Annotated modified lines");

        Ok(DiffResult::new(script, self.options))
    }

    fn check_size(&self, side: Side, units: usize) -> Result<(), DiffError> {
        match self.options.max_units {
            Some(limit) if units > limit => {
                warn!(%side, units, limit, "Input exceeds line limit");
                Err(DiffError::InputTooLarge { side, units, limit })
            }
            _ => Ok(()),
        }
    }

    // An empty text has nothing to compare, so it contributes no units.
    fn units(&self, text: &str) -> Vec<ComparisonUnit> {
        if text.is_empty() {
            Vec::new()
        } else {
            tokenize_lines(text, &self.options)
        }
    }
}

fn unit_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.bytes().filter(|b| *b == b'\n').count() + 1
    }
}

/// Compute a diff with the given options
pub fn compute_diff(
    left: &str,
    right: &str,
    options: &DiffOptions,
) -> Result<DiffResult, DiffError> {
    DiffGenerator::new(*options).generate(left, right)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::diff::inline::MAX_INLINE_CELLS;
    use crate::diff::script::OpKind;

    fn kinds(result: &DiffResult) -> Vec<OpKind> {
        result.script.iter().map(|op| op.kind()).collect()
    }

    #[test]
    fn test_diff_generator() {
        let generator = DiffGenerator::new(DiffOptions::default());
        let result = generator.generate("a\nb\nc", "a\nx\nc").unwrap();

        assert_eq!(result.stats.additions, 1);
        assert_eq!(result.stats.deletions, 1);
        assert_eq!(result.stats.unchanged, 2);
        assert_eq!(result.stats.modified, 1);
    }

    #[test]
    fn test_empty_inputs() {
        let result = compute_diff("", "", &DiffOptions::default()).unwrap();
        assert!(result.script.is_empty());
        assert_eq!(result.stats, Default::default());

        let result = compute_diff("", "a\nb", &DiffOptions::default()).unwrap();
        assert_eq!(kinds(&result), vec![OpKind::Added, OpKind::Added]);
        assert_eq!(result.right_lines(), vec!["a", "b"]);

        let result = compute_diff("a\nb", "", &DiffOptions::default()).unwrap();
        assert_eq!(kinds(&result), vec![OpKind::Deleted, OpKind::Deleted]);
        assert_eq!(result.left_lines(), vec!["a", "b"]);
    }

    #[test]
    fn test_trailing_newline_is_a_line() {
        let result = compute_diff("a\n", "a", &DiffOptions::default()).unwrap();
        assert_eq!(kinds(&result), vec![OpKind::Unchanged, OpKind::Deleted]);
        assert_eq!(result.script[1].left_text(), Some(""));
    }

    #[test]
    fn test_input_too_large() {
        let options = DiffOptions::new().max_units(Some(2));

        let err = compute_diff("a\nb\nc", "a", &options).unwrap_err();
        assert_eq!(
            err,
            DiffError::InputTooLarge {
                side: Side::Left,
                units: 3,
                limit: 2,
            }
        );

        let err = compute_diff("a", "a\nb\nc\nd", &options).unwrap_err();
        assert!(matches!(
            err,
            DiffError::InputTooLarge {
                side: Side::Right,
                units: 4,
                ..
            }
        ));

        assert!(compute_diff("a\nb", "c\nd", &options).is_ok());
    }

    #[test]
    fn test_unlimited_ceiling() {
        let big = vec!["x"; 100].join("\n");
        let options = DiffOptions::new().max_units(None);
        let result = compute_diff(&big, &big, &options).unwrap();
        assert_eq!(result.stats.unchanged, 100);
    }

    #[test]
    fn test_invalid_options_rejected_first() {
        let options = DiffOptions::new().max_units(Some(0));
        assert!(matches!(
            compute_diff("", "", &options),
            Err(DiffError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_cancellation() {
        let token = CancellationToken::new();
        let generator = DiffGenerator::new(DiffOptions::default()).with_cancellation(token.clone());
        assert!(generator.generate("a\nb", "b\nc").is_ok());

        token.cancel();
        assert_eq!(
            generator.generate("a\nb", "b\nc").unwrap_err(),
            DiffError::Cancelled
        );
    }

    #[test]
    fn test_generate_with_closure() {
        let generator = DiffGenerator::default();
        let result = generator.generate_with("a", "b", &|| true);
        assert_eq!(result.unwrap_err(), DiffError::Cancelled);
    }

    #[test]
    fn test_options_echo() {
        let options = DiffOptions::new().case_sensitive(false).ignore_whitespace(true);
        let result = compute_diff("A  b", "a b", &options).unwrap();

        assert_eq!(result.options, options);
        assert_eq!(kinds(&result), vec![OpKind::Unchanged]);
        assert_eq!(result.script[0].left_text(), Some("A  b"));
        assert_eq!(result.script[0].right_text(), Some("a b"));
    }

    #[test]
    fn test_cell_budget() {
        let options = DiffOptions::new().max_cells(Some(12));

        let err = compute_diff("a
b
c", "a
b
c", &options).unwrap_err();
        assert_eq!(
            err,
            DiffError::TableTooLarge {
                rows: 4,
                cols: 4,
                limit: 12,
            }
        );

        assert!(compute_diff("a
b", "a
b
c", &options).is_ok());
        assert!(compute_diff("a
b
c", "a
b
c", &options.max_cells(None)).is_ok());
    }

    #[test]
    fn test_cancellation_reaches_character_pass() {
        // One line per side keeps the line table to a single row, so the
        // second poll comes from the character table.
        let polls = Cell::new(0);
        let cancel = || {
            polls.set(polls.get() + 1);
            polls.get() > 1
        };
        let left = "a".repeat(500);
        let right = "b".repeat(500);

        let result = DiffGenerator::default().generate_with(&left, &right, &cancel);

        assert_eq!(result.unwrap_err(), DiffError::Cancelled);
        assert!(polls.get() >= 2);
    }

    #[test]
    fn test_oversized_pair_keeps_line_classification() {
        let left = "a".repeat(300_000);
        let right = "b".repeat(300_000);
        assert!(left.len() * right.len() > MAX_INLINE_CELLS);

        let result = compute_diff(&left, &right, &DiffOptions::default()).unwrap();

        assert_eq!(kinds(&result), vec![OpKind::Deleted, OpKind::Added]);
        assert!(result.script.iter().all(|op| op.inline().is_none()));
        assert_eq!(result.stats.modified, 0);
        assert_eq!(result.stats.deletions, 1);
        assert_eq!(result.stats.additions, 1);
    }
}
