use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests, normalizes, summarizes, or emits a workbook.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a JSON configuration file cannot be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the `.xlsx` reader.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Errors bubbled up from the legacy `.xls` reader.
    #[error("Excel (xls) read error: {0}")]
    XlsRead(#[from] calamine::XlsError),

    /// Raised when the input bytes are neither an `.xlsx` nor an `.xls` file.
    #[error("unsupported spreadsheet format: expected an .xlsx or .xls workbook")]
    UnsupportedFormat,

    /// Raised when a workbook does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when no row of the sheet contains the header marker.
    #[error("no '{marker}' header found in the uploaded file")]
    HeaderNotFound { marker: String },

    /// Raised when a grouping column is absent after normalization.
    #[error("required key column '{0}' is missing from the table")]
    MissingKeyColumn(String),

    /// Raised under strict coercion when a cell cannot be summed.
    #[error("cannot sum value '{value}' in column {column}")]
    TypeCoercion { column: String, value: String },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
