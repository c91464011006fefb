//! Line and character level diff engine
//!
//! The pipeline tokenizes both inputs into lines, builds the LCS table,
//! backtracks it into an edit script and then annotates adjacent
//! deleted/added lines with a character-level diff. Formatting into unified
//! or side-by-side views is a pure projection of the resulting script.

pub mod cancel;
pub mod formatter;
pub mod generator;
pub mod inline;
pub mod lcs;
pub mod options;
pub mod result;
pub mod script;
pub mod tokenizer;

// Re-export the main types for easier use
pub use cancel::{CancelCheck, CancellationToken};
pub use formatter::{DiffFormatter, OutputFormat, SideBySide, SideRow};
pub use generator::{compute_diff, DiffGenerator};
pub use inline::{CharEditOperation, InlineChanges, MAX_INLINE_CELLS};
pub use lcs::LcsMatrix;
pub use options::{DiffOptions, DEFAULT_MAX_CELLS, DEFAULT_MAX_UNITS};
pub use result::{DiffResult, Statistics};
pub use script::{EditOperation, OpKind};
pub use tokenizer::ComparisonUnit;

/// Render a result as a unified listing
pub fn render_unified(result: &DiffResult) -> String {
    DiffFormatter::render_unified(result)
}

/// Render a result as parallel left/right rows
pub fn render_side_by_side(result: &DiffResult) -> SideBySide {
    DiffFormatter::render_side_by_side(result)
}
