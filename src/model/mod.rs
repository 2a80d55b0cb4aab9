use std::fmt;

/// Name of a column in a normalized or summary table.
pub type ColumnName = String;

/// A single spreadsheet value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Blank cell.
    #[default]
    Empty,
    /// Plain string value.
    Text(String),
    /// Numeric value. Excel stores every number as a double.
    Number(f64),
    /// Boolean value.
    Bool(bool),
}

impl Cell {
    /// Returns `true` for blank cells and for text made only of whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }

    /// Display text used for header names, marker comparison and text key
    /// matching. Integral numbers render without a fractional part, so
    /// `1001.0` and `"1001"` share the same text.
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(value) => value.clone(),
            Cell::Number(value) => value.to_string(),
            Cell::Bool(value) => value.to_string(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(value) => f.write_str(value),
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// Rows of cells exactly as they were decoded from the first worksheet. No row
/// is treated as a header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }
}

/// The slice of a raw table below its promoted header row. Column names may
/// still repeat.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandidateTable {
    pub columns: Vec<ColumnName>,
    pub rows: Vec<Vec<Cell>>,
}

/// A table with unique column names and rows as wide as the column list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedTable {
    pub columns: Vec<ColumnName>,
    pub rows: Vec<Vec<Cell>>,
}

impl NormalizedTable {
    /// Position of the named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

/// Aggregated rows, one per distinct composite key. Key columns come first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    pub columns: Vec<ColumnName>,
    pub key_width: usize,
    pub rows: Vec<Vec<Cell>>,
}

impl SummaryTable {
    /// Key cells of every row, in output order.
    pub fn keys(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|row| &row[..self.key_width.min(row.len())])
    }

    /// Looks up the cell of the given column in the row whose key cells render
    /// to `key`.
    pub fn value(&self, key: &[&str], column: &str) -> Option<&Cell> {
        let col_idx = self.columns.iter().position(|name| name == column)?;
        self.rows
            .iter()
            .find(|row| {
                row.len() >= key.len()
                    && row.iter().zip(key).all(|(cell, wanted)| cell.text() == *wanted)
            })
            .and_then(|row| row.get(col_idx))
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.columns.join("\t"))?;
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(Cell::to_string).collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}
