//! Spreadsheet adapters at the edges of the pipeline.

pub mod excel_read;
pub mod excel_write;
