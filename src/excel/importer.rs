//! Workbook decoder: bytes -> sheets of cells
//!
//! The decoder is the final arbiter of whether an upload really is a
//! workbook. It knows nothing about the upload pre-filter, so the decoding
//! library can be swapped by implementing [`WorkbookDecoder`].

use std::io::{Cursor, Read, Seek};

use calamine::{Data, DataType, Range, Reader, Xls, Xlsx};
use tracing::debug;

use super::cells::{CellValue, LoadedWorkbook, Sheet};
use super::upload::WorkbookFormat;
use crate::error::{ImportError, ImportResult};

/// Turns raw workbook bytes into a [`LoadedWorkbook`]
pub trait WorkbookDecoder: Send + Sync {
    fn decode(&self, content: &[u8], format: WorkbookFormat) -> ImportResult<LoadedWorkbook>;
}

/// Decoder backed by calamine (`Xlsx` for .xlsx, `Xls` for .xls)
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineDecoder;

impl WorkbookDecoder for CalamineDecoder {
    fn decode(&self, content: &[u8], format: WorkbookFormat) -> ImportResult<LoadedWorkbook> {
        let cursor = Cursor::new(content);
        let sheets = match format {
            WorkbookFormat::Xlsx => {
                let workbook: Xlsx<_> = Xlsx::new(cursor).map_err(unreadable)?;
                read_sheets(workbook)?
            }
            WorkbookFormat::Xls => {
                let workbook: Xls<_> = Xls::new(cursor).map_err(unreadable)?;
                read_sheets(workbook)?
            }
        };
        debug!(sheets = sheets.len(), format = format.extension(), "decoded workbook");
        Ok(LoadedWorkbook::new(sheets))
    }
}

fn unreadable(err: impl std::fmt::Display) -> ImportError {
    ImportError::Unreadable(err.to_string())
}

/// Read every sheet, in workbook order
fn read_sheets<RS, R>(mut workbook: R) -> ImportResult<Vec<Sheet>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let sheet_names = workbook.sheet_names();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(unreadable)?;
        sheets.push(Sheet::new(sheet_name, range_to_rows(&range)));
    }

    Ok(sheets)
}

/// Convert a calamine range into rows anchored at A1.
///
/// calamine ranges start at the first used cell, so positions are read with
/// absolute coordinates to keep the fixed Sheet1 layout intact.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((last_row, last_col)) = range.end() else {
        return Vec::new();
    };

    (0..=last_row)
        .map(|row| {
            (0..=last_col)
                .map(|col| {
                    range
                        .get_value((row, col))
                        .map(convert_cell)
                        .unwrap_or(CellValue::Empty)
                })
                .collect()
        })
        .collect()
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(cell.to_string())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn workbook_bytes() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("basic").unwrap();
        sheet.write_string(0, 1, "Smith").unwrap();
        sheet.write_number(2, 3, 1.5).unwrap();
        let second = workbook.add_worksheet();
        second.set_name("schedule").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_decode_xlsx_keeps_absolute_positions() {
        let loaded = CalamineDecoder
            .decode(&workbook_bytes(), WorkbookFormat::Xlsx)
            .unwrap();

        assert_eq!(loaded.sheets.len(), 2);
        let basic = &loaded.sheets[0];
        assert_eq!(basic.name, "basic");
        assert_eq!(basic.height(), 3);
        assert_eq!(basic.width(), 4);
        assert_eq!(basic.cell(0, 0), &CellValue::Empty);
        assert_eq!(basic.cell(0, 1), &CellValue::Text("Smith".into()));
        assert_eq!(basic.cell(2, 3), &CellValue::Number(1.5));
        assert!(loaded.sheets[1].is_empty());
    }

    #[test]
    fn test_decode_garbage_is_unreadable() {
        let err = CalamineDecoder
            .decode(b"PK\x03\x04 not really a zip", WorkbookFormat::Xlsx)
            .unwrap_err();
        assert!(matches!(err, ImportError::Unreadable(_)));

        let err = CalamineDecoder
            .decode(&[0xffu8; 2048], WorkbookFormat::Xls)
            .unwrap_err();
        assert!(matches!(err, ImportError::Unreadable(_)));
    }
}
