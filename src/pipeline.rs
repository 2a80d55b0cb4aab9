use std::path::Path;

use tracing::{debug, info, instrument};

use crate::aggregate::Aggregator;
use crate::config::SummaryConfig;
use crate::error::Result;
use crate::io::{excel_read, excel_write};
use crate::model::{RawTable, SummaryTable};
use crate::normalize::TableNormalizer;

/// Normalizes a raw sheet and aggregates it into a summary.
#[instrument(level = "debug", skip_all, fields(raw_rows = raw.rows.len()))]
pub fn build_summary(raw: RawTable, config: &SummaryConfig) -> Result<SummaryTable> {
    let normalizer = TableNormalizer::new(config.normalizer.clone());
    let table = normalizer.normalize(raw)?;
    debug!(
        columns = table.columns.len(),
        rows = table.rows.len(),
        "table normalized"
    );

    let aggregator = Aggregator::new(config.aggregator.clone());
    aggregator.summarize(table)
}

/// Turns uploaded workbook bytes into the bytes of the summary workbook.
#[instrument(level = "info", skip_all, fields(input_bytes = input.len()))]
pub fn summarize_bytes(input: &[u8], config: &SummaryConfig) -> Result<Vec<u8>> {
    let raw = excel_read::read_raw_table(input)?;
    let summary = build_summary(raw, config)?;
    info!(summary_rows = summary.rows.len(), "summary built");
    excel_write::write_summary(&summary, &config.sheet_name)
}

/// Reads a workbook from `input`, writes its summary to `output` and returns
/// the summary for display.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn summarize_file(input: &Path, output: &Path, config: &SummaryConfig) -> Result<SummaryTable> {
    let raw = excel_read::read_raw_table_from_path(input)?;
    info!(raw_rows = raw.rows.len(), "read worksheet");
    let summary = build_summary(raw, config)?;
    info!(summary_rows = summary.rows.len(), "summary built");
    excel_write::write_summary_to_path(output, &summary, &config.sheet_name)?;
    Ok(summary)
}
