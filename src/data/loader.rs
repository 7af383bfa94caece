//! Workbook Loader Module
//! Reads the first worksheet of an .xlsx file into a text-only Polars DataFrame.

use calamine::{Data, Range, Reader, Xlsx, XlsxError};
use polars::prelude::*;
use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to open file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] XlsxError),
    #[error("Workbook has no worksheet")]
    NoWorksheet,
    #[error("Failed to build table: {0}")]
    Polars(#[from] PolarsError),
}

/// Holds the uploaded order sheet between runs so the offsets can change
/// without picking the file again.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Load the first sheet of an .xlsx file.
    ///
    /// A failed load clears whatever was loaded before, so a stale table is
    /// never filtered against a new upload.
    pub fn load_xlsx(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        self.df = None;

        let bytes = fs::read(file_path)?;
        let df = read_xlsx_bytes(&bytes)?;

        Ok(&*self.df.insert(df))
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }
}

/// Read an uploaded .xlsx blob (first sheet only).
pub fn read_xlsx_bytes(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
    let workbook = Xlsx::new(Cursor::new(bytes))?;
    read_first_sheet(workbook)
}

fn read_first_sheet<RS: Read + Seek>(mut workbook: Xlsx<RS>) -> Result<DataFrame, LoaderError> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoaderError::NoWorksheet)??;
    range_to_dataframe(&range)
}

/// First row is the header, every other row is data. All columns are text.
fn range_to_dataframe(range: &Range<Data>) -> Result<DataFrame, LoaderError> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };

    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = cell_to_string(cell);
            if name.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                name
            }
        })
        .collect();

    let mut values: Vec<Vec<String>> = vec![Vec::with_capacity(range.height()); names.len()];
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(column) = values.get_mut(idx) {
                column.push(cell_to_string(cell));
            }
        }
    }

    let columns = names
        .iter()
        .zip(values)
        .map(|(name, column)| Column::new(name.as_str().into(), column))
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Text form of a single cell.
pub fn cell_to_string(cell: &Data) -> String {
    #[allow(unreachable_patterns)]
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| format_number(dt.as_f64())),
        Data::Error(e) => e.to_string(),
        other => other.to_string(),
    }
}

// xlsx stores every number as a double; phone numbers must not pick up ".0".
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    fn text_values(df: &DataFrame, name: &str) -> Vec<String> {
        df.column(name)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn numbers_keep_integer_text() {
        assert_eq!(format_number(201112223334.0), "201112223334");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn cells_are_stringified() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
        assert_eq!(
            cell_to_string(&Data::String("Ahmed Ali".to_string())),
            "Ahmed Ali"
        );
        assert_eq!(
            cell_to_string(&Data::DateTimeIso("2024-05-01T10:00:00".to_string())),
            "2024-05-01T10:00:00"
        );
    }

    #[test]
    fn reads_first_sheet_with_typed_cells() {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let delivered = ExcelDateTime::from_ymd(2024, 5, 1).unwrap();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "phone_number").unwrap();
        sheet.write_string(0, 1, "customer_name").unwrap();
        sheet.write_string(0, 2, "delivery_status_date").unwrap();
        sheet.write_number(1, 0, 201112223334.0).unwrap();
        sheet.write_string(1, 1, "Ahmed Ali").unwrap();
        sheet
            .write_datetime_with_format(1, 2, &delivered, &date_format)
            .unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let df = read_xlsx_bytes(&bytes).unwrap();

        assert_eq!(df.height(), 1);
        assert_eq!(text_values(&df, "phone_number"), vec!["201112223334"]);
        assert_eq!(text_values(&df, "customer_name"), vec!["Ahmed Ali"]);
        assert_eq!(
            text_values(&df, "delivery_status_date"),
            vec!["2024-05-01 00:00:00"]
        );
    }

    #[test]
    fn blank_header_gets_placeholder_name() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "phone_number").unwrap();
        sheet.write_string(0, 2, "notes").unwrap();
        sheet.write_string(1, 0, "100").unwrap();
        sheet.write_string(1, 1, "x").unwrap();
        sheet.write_string(1, 2, "y").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let df = read_xlsx_bytes(&bytes).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(names, vec!["phone_number", "Unnamed: 1", "notes"]);
    }

    #[test]
    fn missing_date_cell_does_not_block_the_report() {
        use crate::data::OrderFilter;
        use chrono::NaiveDate;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "phone_number").unwrap();
        sheet.write_string(0, 1, "customer_name").unwrap();
        sheet.write_string(0, 2, "delivery_status_date").unwrap();
        sheet.write_string(1, 0, "201112223334").unwrap();
        sheet.write_string(1, 1, "Ahmed Ali").unwrap();
        sheet.write_string(1, 2, "2024-05-01 10:00").unwrap();
        sheet.write_string(2, 0, "201000000002").unwrap();
        sheet.write_string(2, 1, "Hany Two").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let df = read_xlsx_bytes(&bytes).unwrap();
        assert_eq!(
            text_values(&df, "delivery_status_date"),
            vec!["2024-05-01 10:00", ""]
        );

        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let report = OrderFilter::filter_orders(&df, 14, 0, today).unwrap();
        assert_eq!(report.latest.row_count(), 1);
        assert_eq!(report.old.row_count(), 0);
    }

    #[test]
    fn rejects_non_workbook_bytes() {
        let err = read_xlsx_bytes(b"phone_number,customer_name\n").unwrap_err();
        assert!(matches!(err, LoaderError::Workbook(_)));
    }

    #[test]
    fn missing_file_leaves_loader_empty() {
        let mut loader = DataLoader::new();
        let result = loader.load_xlsx(Path::new("/nonexistent/orders.xlsx"));

        assert!(matches!(result, Err(LoaderError::Io(_))));
        assert!(loader.get_dataframe().is_none());
        assert_eq!(loader.get_row_count(), 0);
        assert!(loader.get_columns().is_empty());
    }
}
