use std::io::Cursor;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};

use crate::import::columns::{CellValue, RawSpreadsheetRow};

/// Turns raw file bytes into header-keyed rows.
pub trait SpreadsheetDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<RawSpreadsheetRow>>;
}

/// Reads the first worksheet of an xlsx/xlsm/xls/ods workbook. The first row
/// holds the headers; fully empty rows are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookDecoder;

impl SpreadsheetDecoder for WorkbookDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<RawSpreadsheetRow>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .context("failed to open workbook")?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("workbook has no sheets"))?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("failed to read sheet '{sheet_name}'"))?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row.iter().map(header_text).collect(),
            None => return Ok(Vec::new()),
        };

        let decoded = rows
            .map(|cells| {
                headers
                    .iter()
                    .zip(cells.iter())
                    .filter(|(header, _)| !header.is_empty())
                    .map(|(header, cell)| (header.clone(), cell_value(cell)))
                    .collect::<RawSpreadsheetRow>()
            })
            .filter(|row| row.values().any(|cell| !cell.is_empty()))
            .collect();

        Ok(decoded)
    }
}

fn header_text(cell: &Data) -> String {
    cell_value(cell).as_text().unwrap_or_default()
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::Text(value.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Empty),
        Data::DurationIso(text) => CellValue::Text(text.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_bytes_fail_to_decode() {
        let result = WorkbookDecoder.decode(b"definitely not a spreadsheet");
        assert!(result.is_err());
    }

    #[test]
    fn converts_calamine_cells() {
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(cell_value(&Data::Int(50)), CellValue::Number(50.0));
        assert_eq!(cell_value(&Data::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(
            cell_value(&Data::String("Dana".into())),
            CellValue::Text("Dana".into())
        );
        assert_eq!(header_text(&Data::String("  משאב ".into())), "משאב");
    }
}
