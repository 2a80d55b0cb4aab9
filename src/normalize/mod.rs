//! Header discovery and cleanup for raw spreadsheet exports.
//!
//! Exports place their table under a variable number of title rows. The
//! normalizer finds the row carrying the marker literal, promotes it to the
//! column names, skips the anchor rows below it, removes noise columns and
//! makes every column name unique.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::config::NormalizerConfig;
use crate::error::{Result, ToolError};
use crate::model::{CandidateTable, Cell, ColumnName, NormalizedTable, RawTable};

/// Runs the normalization steps in order with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct TableNormalizer {
    config: NormalizerConfig,
}

impl TableNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Turns a raw sheet into a table with unique column names.
    #[instrument(level = "debug", skip_all, fields(raw_rows = raw.rows.len()))]
    pub fn normalize(&self, raw: RawTable) -> Result<NormalizedTable> {
        let header_row = locate_header(&raw, &self.config.marker)?;
        debug!(header_row, "located header row");

        let candidate = slice_below_header(raw, header_row, &self.config);
        let candidate = drop_noise_columns(candidate, &self.config.noise_columns);
        let columns = deduplicate_column_names(&candidate.columns);
        debug!(
            columns = columns.len(),
            rows = candidate.rows.len(),
            "normalized table"
        );

        Ok(NormalizedTable {
            columns,
            rows: candidate.rows,
        })
    }
}

/// Returns the index of the first row with a cell equal to `marker`.
pub fn locate_header(table: &RawTable, marker: &str) -> Result<usize> {
    table
        .rows
        .iter()
        .position(|row| row.iter().any(|cell| cell_matches(cell, marker)))
        .ok_or_else(|| ToolError::HeaderNotFound {
            marker: marker.to_string(),
        })
}

fn cell_matches(cell: &Cell, marker: &str) -> bool {
    match cell {
        Cell::Text(value) => value == marker,
        Cell::Empty => false,
        other => other.text() == marker,
    }
}

/// Promotes the row at `header_row` to column names and keeps the rows after
/// the anchor rows. Every kept row is as wide as the header.
pub fn slice_below_header(
    table: RawTable,
    header_row: usize,
    config: &NormalizerConfig,
) -> CandidateTable {
    let mut rows = table.rows.into_iter().skip(header_row);
    let Some(header) = rows.next() else {
        return CandidateTable::default();
    };

    let columns: Vec<ColumnName> = header
        .iter()
        .enumerate()
        .map(|(col_idx, cell)| {
            if cell.is_blank() {
                format!("Unnamed: {col_idx}")
            } else {
                cell.text()
            }
        })
        .collect();

    let width = columns.len();
    let rows = rows
        .skip(config.boilerplate_rows)
        .skip(config.offset_rows)
        .map(|mut row| {
            row.resize(width, Cell::Empty);
            row
        })
        .collect();

    CandidateTable { columns, rows }
}

/// Removes every column whose name is listed in `names`. Names that are not
/// present are ignored.
pub fn drop_noise_columns(table: CandidateTable, names: &[String]) -> CandidateTable {
    let noise: HashSet<&str> = names.iter().map(String::as_str).collect();
    let keep: Vec<bool> = table
        .columns
        .iter()
        .map(|column| !noise.contains(column.as_str()))
        .collect();

    if keep.iter().all(|kept| *kept) {
        return table;
    }

    let dropped: Vec<&String> = table
        .columns
        .iter()
        .zip(&keep)
        .filter(|(_, kept)| !**kept)
        .map(|(column, _)| column)
        .collect();
    debug!(?dropped, "dropping noise columns");

    let columns = retain_by_mask(table.columns, &keep);
    let rows = table
        .rows
        .into_iter()
        .map(|row| retain_by_mask(row, &keep))
        .collect();

    CandidateTable { columns, rows }
}

fn retain_by_mask<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, kept)| kept.then_some(item))
        .collect()
}

/// Renames repeated column names: the first occurrence keeps its name and the
/// k-th repeat becomes `name_k`. A suffixed name that is already taken moves
/// on to the next free `k`.
pub fn deduplicate_column_names(names: &[ColumnName]) -> Vec<ColumnName> {
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut repeats: HashMap<&str, usize> = HashMap::new();

    names
        .iter()
        .map(|name| {
            if seen.insert(name.as_str()) {
                return name.clone();
            }
            let counter = repeats.entry(name.as_str()).or_insert(0);
            loop {
                *counter += 1;
                let candidate = format!("{name}_{counter}");
                if taken.insert(candidate.clone()) {
                    return candidate;
                }
            }
        })
        .collect()
}
