use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data as DataType, Range, Reader, Xls, Xlsx};
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::model::{Cell, RawTable};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Container formats accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    /// Office Open XML workbook (`.xlsx`).
    Xlsx,
    /// Legacy BIFF workbook (`.xls`).
    Xls,
}

/// Detects the workbook container from its leading bytes.
pub fn detect_format(bytes: &[u8]) -> Option<SpreadsheetFormat> {
    if bytes.starts_with(ZIP_MAGIC) {
        Some(SpreadsheetFormat::Xlsx)
    } else if bytes.starts_with(OLE_MAGIC) {
        Some(SpreadsheetFormat::Xls)
    } else {
        None
    }
}

/// Decodes the first worksheet of an `.xlsx` or `.xls` workbook. Row and column
/// indices of the returned table match the sheet's (zero based).
pub fn read_raw_table(bytes: &[u8]) -> Result<RawTable> {
    let cursor = Cursor::new(bytes);
    let range = match detect_format(bytes).ok_or(ToolError::UnsupportedFormat)? {
        SpreadsheetFormat::Xlsx => first_sheet(Xlsx::new(cursor)?)?,
        SpreadsheetFormat::Xls => first_sheet(Xls::new(cursor)?)?,
    };
    Ok(range_to_table(&range))
}

/// Reads a workbook file and decodes its first worksheet.
pub fn read_raw_table_from_path(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    read_raw_table(&bytes)
}

fn first_sheet<RS, R>(mut workbook: R) -> Result<Range<DataType>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    ToolError: From<R::Error>,
{
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ToolError::InvalidWorkbook("workbook has no worksheets".into()))??;
    Ok(range)
}

fn range_to_table(range: &Range<DataType>) -> RawTable {
    let (leading_rows, leading_cols) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));
    let width = leading_cols + range.width();

    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(leading_rows + range.height());
    rows.extend((0..leading_rows).map(|_| vec![Cell::Empty; width]));
    rows.extend(range.rows().map(|row| {
        let mut cells = vec![Cell::Empty; leading_cols];
        cells.extend(row.iter().map(|cell| cell_from_data(Some(cell))));
        cells
    }));

    debug!(rows = rows.len(), columns = width, "decoded worksheet");
    RawTable::new(rows)
}

fn cell_from_data(cell: Option<&DataType>) -> Cell {
    match cell {
        Some(DataType::String(value)) => Cell::Text(value.clone()),
        Some(DataType::Float(value)) => Cell::Number(*value),
        Some(DataType::Int(value)) => Cell::Number(*value as f64),
        Some(DataType::Bool(value)) => Cell::Bool(*value),
        Some(DataType::Empty) | None => Cell::Empty,
        Some(other) => Cell::Text(other.to_string()),
    }
}
