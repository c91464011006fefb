//! Configuration management for linediff
//!
//! Settings come from an optional TOML file, then environment variables,
//! then command-line flags, each layer overriding the previous one.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::diff::{DiffOptions, DEFAULT_MAX_CELLS, DEFAULT_MAX_UNITS};
use crate::error::DiffError;

/// Global configuration for linediff
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineDiffConfig {
    /// Comparison settings
    pub diff: DiffSection,
    /// Output settings
    pub render: RenderSection,
}

/// Configuration for comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffSection {
    pub case_sensitive: bool,
    pub ignore_whitespace: bool,
    /// Line ceiling per side. Signed so a negative value is reported as
    /// invalid instead of failing to parse.
    pub max_units: Option<i64>,
    /// Cell budget for the line-level LCS table
    pub max_cells: Option<i64>,
}

/// Configuration for output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    /// Total width for the side-by-side text view
    pub width: usize,
    /// Show `{-x-}`/`{+y+}` markers on modified lines in the unified view
    pub inline_markers: bool,
    pub color: bool,
}

impl Default for DiffSection {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            ignore_whitespace: false,
            max_units: Some(DEFAULT_MAX_UNITS as i64),
            max_cells: Some(DEFAULT_MAX_CELLS as i64),
        }
    }
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            width: 120,
            inline_markers: false,
            color: true,
        }
    }
}

/// Minimum usable width for the side-by-side view
pub const MIN_WIDTH: usize = 20;

impl LineDiffConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `LINEDIFF_*` overrides read through `lookup`.
    /// Values that do not parse are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(flag) = lookup("LINEDIFF_CASE_SENSITIVE").and_then(|v| v.parse::<bool>().ok()) {
            self.diff.case_sensitive = flag;
        }

        if let Some(flag) = lookup("LINEDIFF_IGNORE_WHITESPACE").and_then(|v| v.parse::<bool>().ok()) {
            self.diff.ignore_whitespace = flag;
        }

        if let Some(val) = lookup("LINEDIFF_MAX_UNITS") {
            if let Some(limit) = parse_limit(&val) {
                self.diff.max_units = limit;
            }
        }

        if let Some(val) = lookup("LINEDIFF_MAX_CELLS") {
            if let Some(limit) = parse_limit(&val) {
                self.diff.max_cells = limit;
            }
        }

        if let Some(width) = lookup("LINEDIFF_WIDTH").and_then(|v| v.parse::<usize>().ok()) {
            self.render.width = width;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), DiffError> {
        self.to_options()?;

        if self.render.width < MIN_WIDTH {
            return Err(DiffError::InvalidOptions(format!(
                "width must be at least {}, got {}",
                MIN_WIDTH, self.render.width
            )));
        }

        Ok(())
    }

    /// Diff options described by this configuration
    pub fn to_options(&self) -> Result<DiffOptions, DiffError> {
        let max_units = self
            .diff
            .max_units
            .map(|v| DiffOptions::limit_from_signed("max_units", v))
            .transpose()?;
        let max_cells = self
            .diff
            .max_cells
            .map(|v| DiffOptions::limit_from_signed("max_cells", v))
            .transpose()?;

        let options = DiffOptions::new()
            .case_sensitive(self.diff.case_sensitive)
            .ignore_whitespace(self.diff.ignore_whitespace)
            .max_units(max_units)
            .max_cells(max_cells);
        options.validate()?;
        Ok(options)
    }
}

// "none" lifts the limit; anything unparsable is ignored
fn parse_limit(val: &str) -> Option<Option<i64>> {
    if val.eq_ignore_ascii_case("none") {
        Some(None)
    } else {
        val.parse::<i64>().ok().map(Some)
    }
}
