use serde::{Deserialize, Serialize};

use super::inline::InlineChanges;
use super::result::DiffResult;
use super::script::{EditOperation, OpKind};

/// Different output formats for diffs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Single column with +/-/space prefixes
    #[default]
    Unified,
    /// Two parallel columns
    SideBySide,
    /// Full result as JSON
    Json,
    /// Counts only
    Stats,
}

/// One cell of the side-by-side view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideRow {
    pub line_number: usize,
    pub text: String,
    pub kind: OpKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<InlineChanges>,
}

/// Parallel row arrays; `None` is a blank cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideBySide {
    pub left_rows: Vec<Option<SideRow>>,
    pub right_rows: Vec<Option<SideRow>>,
}

/// Formats diff results into various text representations
pub struct DiffFormatter;

impl DiffFormatter {
    /// Plain unified listing: sign, left number, right number, text
    pub fn render_unified(result: &DiffResult) -> String {
        Self::unified_lines(result, false).join("\n")
    }

    /// Unified listing with `{-x-}` / `{+y+}` markers on modified lines
    pub fn render_unified_inline(result: &DiffResult) -> String {
        Self::unified_lines(result, true).join("\n")
    }

    fn unified_lines(result: &DiffResult, with_inline: bool) -> Vec<String> {
        let width = Self::number_width(result);

        result
            .script
            .iter()
            .map(|op| {
                let sign = match op.kind() {
                    OpKind::Unchanged => ' ',
                    OpKind::Added => '+',
                    OpKind::Deleted => '-',
                };
                let text = match (with_inline, op.inline()) {
                    (true, Some(inline)) => Self::format_inline(inline),
                    _ => op
                        .left_text()
                        .or_else(|| op.right_text())
                        .unwrap_or_default()
                        .to_string(),
                };
                format!(
                    "{}{} {} | {}",
                    sign,
                    Self::line_number(op.left_line(), width),
                    Self::line_number(op.right_line(), width),
                    text
                )
            })
            .collect()
    }

    /// Project the script into two parallel columns
    pub fn render_side_by_side(result: &DiffResult) -> SideBySide {
        let mut view = SideBySide::default();

        for op in &result.script {
            let left = match op {
                EditOperation::Unchanged { left_line, left_text, .. } => Some(SideRow {
                    line_number: *left_line,
                    text: left_text.clone(),
                    kind: OpKind::Unchanged,
                    inline: None,
                }),
                EditOperation::Deleted { left_line, left_text, inline } => Some(SideRow {
                    line_number: *left_line,
                    text: left_text.clone(),
                    kind: OpKind::Deleted,
                    inline: inline.clone(),
                }),
                EditOperation::Added { .. } => None,
            };
            let right = match op {
                EditOperation::Unchanged { right_line, right_text, .. } => Some(SideRow {
                    line_number: *right_line,
                    text: right_text.clone(),
                    kind: OpKind::Unchanged,
                    inline: None,
                }),
                EditOperation::Added { right_line, right_text, inline } => Some(SideRow {
                    line_number: *right_line,
                    text: right_text.clone(),
                    kind: OpKind::Added,
                    inline: inline.clone(),
                }),
                EditOperation::Deleted { .. } => None,
            };
            view.left_rows.push(left);
            view.right_rows.push(right);
        }

        view
    }

    /// Format a diff result as side-by-side text columns
    pub fn format_side_by_side(result: &DiffResult, width: usize) -> String {
        let number_width = Self::number_width(result);
        // " | " separator plus a "N x " gutter per column
        let gutter = number_width + 3;
        let half_width = width.saturating_sub(3) / 2;
        let text_width = half_width.saturating_sub(gutter);
        let view = Self::render_side_by_side(result);

        view.left_rows
            .iter()
            .zip(&view.right_rows)
            .map(|(left, right)| {
                format!(
                    "{:<half$} | {}",
                    Self::side_cell(left.as_ref(), number_width, text_width),
                    Self::side_cell(right.as_ref(), number_width, text_width),
                    half = half_width
                )
                .trim_end()
                .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn side_cell(row: Option<&SideRow>, number_width: usize, text_width: usize) -> String {
        match row {
            Some(row) => {
                let marker = match row.kind {
                    OpKind::Unchanged => ' ',
                    OpKind::Added => '+',
                    OpKind::Deleted => '-',
                };
                format!(
                    "{:>w$} {} {}",
                    row.line_number,
                    marker,
                    Self::truncate_line(&row.text, text_width),
                    w = number_width
                )
            }
            None => String::new(),
        }
    }

    /// Render a character annotation with `{-removed-}` and `{+added+}` markers
    pub fn format_inline(changes: &InlineChanges) -> String {
        changes
            .segments()
            .into_iter()
            .map(|(kind, text)| match kind {
                OpKind::Unchanged => text,
                OpKind::Added => format!("{{+{}+}}", text),
                OpKind::Deleted => format!("{{-{}-}}", text),
            })
            .collect()
    }

    /// Format diff statistics as a summary
    pub fn format_stats(result: &DiffResult) -> String {
        let stats = &result.stats;

        if stats.is_identical() {
            return "No changes".to_string();
        }

        let mut parts = Vec::new();

        if stats.additions > 0 {
            parts.push(format!(
                "{} insertion{}",
                stats.additions,
                if stats.additions == 1 { "" } else { "s" }
            ));
        }

        if stats.deletions > 0 {
            parts.push(format!(
                "{} deletion{}",
                stats.deletions,
                if stats.deletions == 1 { "" } else { "s" }
            ));
        }

        if stats.modified > 0 {
            parts.push(format!(
                "{} modified line{}",
                stats.modified,
                if stats.modified == 1 { "" } else { "s" }
            ));
        }

        parts.push(format!("{} unchanged", stats.unchanged));

        parts.join(", ")
    }

    fn number_width(result: &DiffResult) -> usize {
        let max_line = result
            .script
            .iter()
            .flat_map(|op| [op.left_line(), op.right_line()])
            .flatten()
            .max()
            .unwrap_or(0);
        max_line.to_string().len()
    }

    fn line_number(line: Option<usize>, width: usize) -> String {
        match line {
            Some(n) => format!("{:>width$}", n, width = width),
            None => " ".repeat(width),
        }
    }

    fn truncate_line(line: &str, max_width: usize) -> String {
        if line.chars().count() <= max_width {
            return line.to_string();
        }
        if max_width > 3 {
            let kept: String = line.chars().take(max_width - 3).collect();
            format!("{}...", kept)
        } else {
            line.chars().take(max_width).collect()
        }
    }
}
