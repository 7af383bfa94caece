//! Excel Export Module
//! Serializes a result table to a single-sheet .xlsx blob (header row, no index).

use polars::prelude::*;
use rust_xlsxwriter::{Format, FormatBorder, Workbook, XlsxError};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Table has {0} columns, more than a worksheet holds")]
    TooWide(usize),
    #[error("Failed to save file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize `df` to .xlsx bytes. Every cell is written as text so order
/// codes keep their leading digits.
pub fn serialize_table(df: &DataFrame) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold().set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();

    for (col_idx, column) in df.get_columns().iter().enumerate() {
        let col = u16::try_from(col_idx).map_err(|_| ExportError::TooWide(df.width()))?;
        worksheet.write_string_with_format(0, col, column.name().as_str(), &header)?;

        let text = column.cast(&DataType::String)?;
        for (row_idx, value) in text.str()?.into_iter().enumerate() {
            worksheet.write_string(row_idx as u32 + 1, col, value.unwrap_or_default())?;
        }
    }

    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

/// Serialize `df` and write it to `path`.
pub fn save_table(df: &DataFrame, path: &Path) -> Result<(), ExportError> {
    let bytes = serialize_table(df)?;
    fs::write(path, bytes)?;
    Ok(())
}
