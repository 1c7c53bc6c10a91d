//! Sheet1: one subject's basic information at fixed cell positions
//!
//! ```text
//!        A        B              C        D
//!   1    label    teacher        label    schedule info (line 1)
//!   2    label    department     label    schedule info (line 2)
//!   3    label    subject name   label    attendance time
//! ```

use super::cells::Sheet;
use crate::error::{ImportError, ImportResult};

/// A 0-indexed (row, col) cell position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

const fn at(row: usize, col: usize) -> CellPos {
    CellPos { row, col }
}

/// Where each Sheet1 field lives. Changing any of these changes what an
/// existing workbook imports as.
pub struct BasicInfoLayout;

impl BasicInfoLayout {
    pub const TEACHER_NAME: CellPos = at(0, 1);
    pub const DEPARTMENT: CellPos = at(1, 1);
    pub const SUBJECT_NAME: CellPos = at(2, 1);
    pub const ATTENDANCE_TIME: CellPos = at(2, 3);
    pub const SCHEDULE_INFO_1: CellPos = at(0, 3);
    pub const SCHEDULE_INFO_2: CellPos = at(1, 3);

    pub const MIN_ROWS: usize = 3;
    pub const MIN_COLS: usize = 4;
}

/// Stand-in name used when the subject cell is absent; never importable
pub const UNKNOWN_SUBJECT: &str = "Unknown Subject";

/// Subject fields extracted from Sheet1
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BasicInfo {
    pub subject_name: String,
    pub teacher_name: String,
    pub department: String,
    pub attendance_time: String,
    pub description: String,
}

impl BasicInfo {
    pub fn extract(sheet: &Sheet) -> ImportResult<Self> {
        let (rows, cols) = (sheet.height(), sheet.width());
        if rows < BasicInfoLayout::MIN_ROWS || cols < BasicInfoLayout::MIN_COLS {
            return Err(ImportError::Sheet1Layout { rows, cols });
        }

        let subject_cell = sheet.cell(
            BasicInfoLayout::SUBJECT_NAME.row,
            BasicInfoLayout::SUBJECT_NAME.col,
        );
        let subject_name = if subject_cell.is_blank() {
            UNKNOWN_SUBJECT.to_string()
        } else {
            subject_cell.to_text().trim().to_string()
        };
        if subject_name.is_empty() || subject_name == UNKNOWN_SUBJECT {
            return Err(ImportError::MissingSubjectName);
        }

        let line1 = text_at(sheet, BasicInfoLayout::SCHEDULE_INFO_1);
        let line2 = text_at(sheet, BasicInfoLayout::SCHEDULE_INFO_2);

        Ok(Self {
            subject_name,
            teacher_name: text_at(sheet, BasicInfoLayout::TEACHER_NAME),
            department: text_at(sheet, BasicInfoLayout::DEPARTMENT),
            attendance_time: text_at(sheet, BasicInfoLayout::ATTENDANCE_TIME),
            description: format!("{}\n{}", line1, line2).trim().to_string(),
        })
    }
}

/// Cell text, or an empty string for missing/blank cells
fn text_at(sheet: &Sheet, pos: CellPos) -> String {
    let cell = sheet.cell(pos.row, pos.col);
    if cell.is_blank() {
        String::new()
    } else {
        cell.to_text()
    }
}
