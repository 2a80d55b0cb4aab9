//! Groups a normalized table by its composite key and sums the remaining
//! columns.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::config::{AggregatorConfig, CoercionPolicy, KeyMatching};
use crate::error::{Result, ToolError};
use crate::model::{Cell, NormalizedTable, SummaryTable};

const BLANK: &Cell = &Cell::Empty;

/// Produces one summary row per distinct key, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Groups rows by the key columns and sums every other column.
    ///
    /// Key cells are compared by value and type unless [`KeyMatching::Text`]
    /// is configured. Rows with a missing key cell are left out. Non-numeric
    /// cells follow the configured [`CoercionPolicy`].
    #[instrument(level = "debug", skip_all, fields(rows = table.rows.len()))]
    pub fn summarize(&self, table: NormalizedTable) -> Result<SummaryTable> {
        let key_indices = self
            .config
            .key_columns
            .iter()
            .map(|name| {
                table
                    .column_index(name)
                    .ok_or_else(|| ToolError::MissingKeyColumn(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let value_indices: Vec<usize> = (0..table.columns.len())
            .filter(|idx| !key_indices.contains(idx))
            .collect();

        let mut columns: Vec<String> = key_indices
            .iter()
            .map(|idx| table.columns[*idx].clone())
            .collect();
        columns.extend(value_indices.iter().map(|idx| table.columns[*idx].clone()));

        let mut groups: Vec<Group> = Vec::new();
        let mut positions: HashMap<Vec<KeyPart>, usize> = HashMap::new();
        let mut skipped = 0usize;

        for row in &table.rows {
            let key_cells: Vec<&Cell> = key_indices
                .iter()
                .map(|idx| row.get(*idx).unwrap_or(BLANK))
                .collect();
            let key: Option<Vec<KeyPart>> = key_cells
                .iter()
                .map(|cell| key_part(cell, self.config.key_matching))
                .collect();
            let Some(key) = key else {
                skipped += 1;
                continue;
            };

            let position = *positions.entry(key).or_insert_with(|| {
                groups.push(Group {
                    key: key_cells.iter().map(|cell| (*cell).clone()).collect(),
                    sums: vec![0.0; value_indices.len()],
                });
                groups.len() - 1
            });

            let group = &mut groups[position];
            for (sum, idx) in group.sums.iter_mut().zip(&value_indices) {
                *sum += self.coerce(&table.columns[*idx], row.get(*idx).unwrap_or(BLANK))?;
            }
        }

        if skipped > 0 {
            debug!(skipped, "rows without a complete key were left out");
        }

        let rows = groups
            .into_iter()
            .map(|group| {
                let mut cells = group.key;
                cells.extend(group.sums.into_iter().map(Cell::Number));
                cells
            })
            .collect();

        Ok(SummaryTable {
            columns,
            key_width: key_indices.len(),
            rows,
        })
    }

    fn coerce(&self, column: &str, cell: &Cell) -> Result<f64> {
        match coerce_number(cell) {
            Some(value) => Ok(value),
            None => match self.config.coercion {
                CoercionPolicy::Lenient => {
                    debug!(column, value = %cell, "treating non-numeric value as zero");
                    Ok(0.0)
                }
                CoercionPolicy::Strict => Err(ToolError::TypeCoercion {
                    column: column.to_string(),
                    value: cell.to_string(),
                }),
            },
        }
    }
}

/// Hashable form of a key cell. Numbers hash by their bit pattern with
/// `-0.0` folded into `0.0`.
#[derive(Debug, PartialEq, Eq, Hash)]
enum KeyPart {
    Text(String),
    Number(u64),
    Bool(bool),
}

fn key_part(cell: &Cell, matching: KeyMatching) -> Option<KeyPart> {
    match (cell, matching) {
        (Cell::Empty, _) => None,
        (Cell::Text(value), _) if value.is_empty() => None,
        (other, KeyMatching::Text) => Some(KeyPart::Text(other.text())),
        (Cell::Text(value), KeyMatching::Exact) => Some(KeyPart::Text(value.clone())),
        (Cell::Number(value), KeyMatching::Exact) => {
            let value = if *value == 0.0 { 0.0 } else { *value };
            Some(KeyPart::Number(value.to_bits()))
        }
        (Cell::Bool(value), KeyMatching::Exact) => Some(KeyPart::Bool(*value)),
    }
}

struct Group {
    key: Vec<Cell>,
    sums: Vec<f64>,
}

/// Numeric value of a cell, or `None` when the text is not a finite number.
/// Blank cells count as zero.
pub fn coerce_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Empty => Some(0.0),
        Cell::Number(value) => Some(*value),
        Cell::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
        Cell::Text(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Some(0.0);
            }
            trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
        }
    }
}
