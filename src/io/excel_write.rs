use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::model::{Cell, SummaryTable};

/// Serializes the summary into `.xlsx` bytes with a single sheet.
pub fn write_summary(table: &SummaryTable, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(table, sheet_name)?;
    Ok(workbook.save_to_buffer()?)
}

/// Writes the summary workbook to the given path.
pub fn write_summary_to_path(path: &Path, table: &SummaryTable, sheet_name: &str) -> Result<()> {
    let mut workbook = build_workbook(table, sheet_name)?;
    workbook.save(path)?;
    Ok(())
}

fn build_workbook(table: &SummaryTable, sheet_name: &str) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col_idx, header) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let excel_col = col_idx as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(value) => {
                    worksheet.write_string(excel_row, excel_col, value)?;
                }
                Cell::Number(value) => {
                    worksheet.write_number(excel_row, excel_col, *value)?;
                }
                Cell::Bool(value) => {
                    worksheet.write_boolean(excel_row, excel_col, *value)?;
                }
            }
        }
    }

    if !table.columns.is_empty() {
        let col_end = (table.columns.len() as u16).saturating_sub(1);
        worksheet.autofilter(0, 0, table.rows.len() as u32, col_end)?;
        worksheet.set_freeze_panes(1, 0)?;
    }

    Ok(workbook)
}
