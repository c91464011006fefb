use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::LineDiffConfig;
use crate::diff::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "linediff")]
#[command(version)]
#[command(about = "Compare two text files line by line with intra-line highlights")]
#[command(long_about = "linediff aligns two texts with a longest-common-subsequence diff, marks the characters that changed on modified lines, and prints a unified, side-by-side, JSON or summary view.")]
pub struct Cli {
    /// Left (original) file
    #[arg(value_name = "LEFT")]
    pub left: PathBuf,

    /// Right (modified) file
    #[arg(value_name = "RIGHT")]
    pub right: PathBuf,

    /// Compare lines case-insensitively
    #[arg(short = 'i', long, help = "Ignore case differences")]
    pub ignore_case: bool,

    /// Collapse whitespace runs and trim line ends before comparing
    #[arg(short = 'w', long, help = "Ignore whitespace differences")]
    pub ignore_whitespace: bool,

    /// Line ceiling per side
    #[arg(long, allow_negative_numbers = true, help = "Maximum lines per input")]
    pub max_lines: Option<i64>,

    /// Cell budget for the line-level comparison table
    #[arg(long, allow_negative_numbers = true, help = "Maximum cells in the line comparison table")]
    pub max_cells: Option<i64>,

    /// Disable the line ceiling and the cell budget
    #[arg(
        long,
        conflicts_with_all = ["max_lines", "max_cells"],
        help = "Accept inputs of any size"
    )]
    pub no_limit: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "unified", help = "Output format")]
    pub format: OutputFormat,

    /// Width of the side-by-side view
    #[arg(long, help = "Total width for side-by-side output")]
    pub width: Option<usize>,

    /// Mark changed characters on modified lines
    #[arg(long, help = "Show {-x-}/{+y+} markers in unified output")]
    pub inline: bool,

    /// Disable colors in output
    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Cli {
    pub fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }

    /// Layer the command-line flags over the loaded configuration
    pub fn resolve_config(&self) -> Result<LineDiffConfig> {
        let mut config = LineDiffConfig::load(self.config.as_deref())?;

        if self.ignore_case {
            config.diff.case_sensitive = false;
        }
        if self.ignore_whitespace {
            config.diff.ignore_whitespace = true;
        }
        if self.no_limit {
            config.diff.max_units = None;
            config.diff.max_cells = None;
        } else {
            if let Some(max) = self.max_lines {
                config.diff.max_units = Some(max);
            }
            if let Some(max) = self.max_cells {
                config.diff.max_cells = Some(max);
            }
        }
        if let Some(width) = self.width {
            config.render.width = width;
        }
        if self.inline {
            config.render.inline_markers = true;
        }
        if self.no_color {
            config.render.color = false;
        }

        config.validate()?;
        Ok(config)
    }

    /// Read both inputs
    pub fn read_inputs(&self) -> Result<(String, String)> {
        Ok((read_text(&self.left)?, read_text(&self.right)?))
    }
}

/// Read a file as text, with the path in any error
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
