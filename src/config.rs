//! Format-specific knobs for the summary pipeline.
//!
//! The defaults describe the HSN/SAC summary export; every field can be
//! overridden from a JSON file so format drift does not require a rebuild.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Literal that identifies the header row.
pub const DEFAULT_MARKER: &str = "HSN/SAC";
/// Rows of boilerplate that always follow the header row.
pub const DEFAULT_BOILERPLATE_ROWS: usize = 2;
/// Rows dropped by fixed offset after the boilerplate.
pub const DEFAULT_OFFSET_ROWS: usize = 1;
/// Columns that carry nothing for the summary.
pub const DEFAULT_NOISE_COLUMNS: [&str; 3] = ["Description", "Type of", "Total Tax"];
/// Composite grouping key.
pub const DEFAULT_KEY_COLUMNS: [&str; 2] = ["HSN/SAC", "UQC"];
/// Name of the single sheet in the output workbook.
pub const SUMMARY_SHEET: &str = "Summary";

/// Top-level configuration of a summary run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub normalizer: NormalizerConfig,
    pub aggregator: AggregatorConfig,
    pub sheet_name: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            aggregator: AggregatorConfig::default(),
            sheet_name: SUMMARY_SHEET.to_string(),
        }
    }
}

impl SummaryConfig {
    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Applies command line overrides on top of this configuration.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        let normalizer = &mut self.normalizer;
        if let Some(marker) = &overrides.marker {
            normalizer.marker = marker.clone();
        }
        if let Some(rows) = overrides.boilerplate_rows {
            normalizer.boilerplate_rows = rows;
        }
        if let Some(rows) = overrides.offset_rows {
            normalizer.offset_rows = rows;
        }
        if !overrides.noise_columns.is_empty() {
            normalizer.noise_columns = overrides.noise_columns.clone();
        }
        if overrides.match_key_text {
            self.aggregator.key_matching = KeyMatching::Text;
        }
        if overrides.strict {
            self.aggregator.coercion = CoercionPolicy::Strict;
        }
        self
    }
}

/// Settings given on the command line. Unset fields keep the file or default
/// value; a non-empty `noise_columns` replaces the whole list.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub marker: Option<String>,
    pub boilerplate_rows: Option<usize>,
    pub offset_rows: Option<usize>,
    pub noise_columns: Vec<String>,
    pub match_key_text: bool,
    pub strict: bool,
}

/// Controls how the header row is found and which rows and columns around it
/// are discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub marker: String,
    pub boilerplate_rows: usize,
    pub offset_rows: usize,
    pub noise_columns: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            boilerplate_rows: DEFAULT_BOILERPLATE_ROWS,
            offset_rows: DEFAULT_OFFSET_ROWS,
            noise_columns: DEFAULT_NOISE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// How non-numeric cells in summed columns are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionPolicy {
    /// Unparseable values count as zero.
    #[default]
    Lenient,
    /// Unparseable values abort the run.
    Strict,
}

/// How key cells are compared when rows are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMatching {
    /// Cells must agree in type and value; `1001` and `"1001"` differ.
    #[default]
    Exact,
    /// Cells match when their display text agrees.
    Text,
}

/// Controls grouping and summation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub key_columns: Vec<String>,
    pub key_matching: KeyMatching,
    pub coercion: CoercionPolicy,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            key_columns: DEFAULT_KEY_COLUMNS.iter().map(|s| s.to_string()).collect(),
            key_matching: KeyMatching::default(),
            coercion: CoercionPolicy::default(),
        }
    }
}
