//! Splitting text into comparison units
//!
//! A unit keeps its original text for display and a normalized form that is
//! the only thing ever compared.

use serde::{Deserialize, Serialize};

use super::options::DiffOptions;

/// One line (or one character, in the intra-line pass)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonUnit {
    pub original: String,
    pub normalized: String,
    /// 1-based position in its own side
    pub position: usize,
}

impl ComparisonUnit {
    pub fn new(original: &str, position: usize, options: &DiffOptions) -> Self {
        Self {
            original: original.to_string(),
            normalized: normalize(original, options),
            position,
        }
    }

    /// Units match when their normalized text is equal
    pub fn matches(&self, other: &ComparisonUnit) -> bool {
        self.normalized == other.normalized
    }
}

/// Derive the comparison form of a line
pub fn normalize(text: &str, options: &DiffOptions) -> String {
    let folded = if options.ignore_whitespace {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        text.to_string()
    };

    if options.case_sensitive {
        folded
    } else {
        folded.to_lowercase()
    }
}

/// Split on `'\n'`, keeping leading and trailing empty lines.
///
/// The empty string yields a single empty unit.
pub fn tokenize_lines(text: &str, options: &DiffOptions) -> Vec<ComparisonUnit> {
    text.split('\n')
        .enumerate()
        .map(|(idx, line)| ComparisonUnit::new(line, idx + 1, options))
        .collect()
}

/// One unit per `char`. Only case folding applies at this granularity.
pub fn tokenize_chars(text: &str, options: &DiffOptions) -> Vec<ComparisonUnit> {
    text.chars()
        .enumerate()
        .map(|(idx, ch)| {
            let original = ch.to_string();
            let normalized = if options.case_sensitive {
                original.clone()
            } else {
                original.to_lowercase()
            };
            ComparisonUnit {
                original,
                normalized,
                position: idx + 1,
            }
        })
        .collect()
}
