//! Sheet2: one row per scheduled session
//!
//! The first row is a header and is ignored; the remaining rows are read by
//! column position. Rows that cannot be turned into a dated session are
//! skipped and reported, never escalated.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cells::{CellValue, Sheet};
use crate::types::DEFAULT_HOURS;

/// Column positions in Sheet2 (0-indexed)
pub struct ScheduleColumns;

impl ScheduleColumns {
    pub const DATE: usize = 1;
    pub const HOURS: usize = 5;
    pub const NOTES: usize = 6;
}

/// Academic year used to put a year on `M月D日` dates.
///
/// April-December fall in `first_year`, January-March in `first_year + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicYear {
    pub first_year: i32,
}

impl Default for AcademicYear {
    fn default() -> Self {
        Self { first_year: 2024 }
    }
}

impl AcademicYear {
    pub fn new(first_year: i32) -> Self {
        Self { first_year }
    }

    pub fn year_for_month(&self, month: u32) -> i32 {
        if month >= 4 {
            self.first_year
        } else {
            self.first_year + 1
        }
    }

    /// Parse `<digits>月<digits>日` at the start of `text` into a date.
    ///
    /// Returns `Err` with the reason when the text does not match or names an
    /// impossible date.
    pub fn parse_session_date(&self, text: &str) -> Result<NaiveDate, SkipReason> {
        let normalized = normalize_digits(text.trim());
        let captures = date_pattern()
            .captures(&normalized)
            .ok_or_else(|| SkipReason::UnrecognizedDate(text.trim().to_string()))?;

        let invalid = || SkipReason::InvalidDate(text.trim().to_string());
        let month: u32 = captures[1].parse().map_err(|_| invalid())?;
        let day: u32 = captures[2].parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(self.year_for_month(month), month, day).ok_or_else(invalid)
    }
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]+)月([0-9]+)日").expect("valid date regex"))
}

/// Map full-width digits (０-９) to ASCII
fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            _ => c,
        })
        .collect()
}

/// Why a Sheet2 row was not imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    BlankDate,
    UnrecognizedDate(String),
    InvalidDate(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::BlankDate => write!(f, "no date"),
            SkipReason::UnrecognizedDate(text) => write!(f, "unrecognized date '{}'", text),
            SkipReason::InvalidDate(text) => write!(f, "invalid date '{}'", text),
        }
    }
}

/// A session parsed from one Sheet2 row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based spreadsheet row number
    pub row_number: usize,
    pub date: NaiveDate,
    pub hours: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row_number: usize,
    pub reason: SkipReason,
}

/// Everything Sheet2 yielded: the usable sessions and the skipped rows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedSchedule {
    pub rows: Vec<ScheduleRow>,
    pub skipped: Vec<SkippedRow>,
}

impl ParsedSchedule {
    pub fn parse(sheet: &Sheet, year: AcademicYear) -> Self {
        let mut parsed = ParsedSchedule::default();

        for (idx, row) in sheet.rows().enumerate().skip(1) {
            let row_number = idx + 1;
            match parse_row(row, year) {
                Ok((date, hours, notes)) => parsed.rows.push(ScheduleRow {
                    row_number,
                    date,
                    hours,
                    notes,
                }),
                Err(reason) => {
                    debug!(row = row_number, %reason, "skipping schedule row");
                    parsed.skipped.push(SkippedRow { row_number, reason });
                }
            }
        }

        parsed
    }
}

fn parse_row(row: &[CellValue], year: AcademicYear) -> Result<(NaiveDate, f64, String), SkipReason> {
    let cell = |col: usize| row.get(col).unwrap_or(&CellValue::Empty);

    let date_cell = cell(ScheduleColumns::DATE);
    if date_cell.is_blank() {
        return Err(SkipReason::BlankDate);
    }
    let date = year.parse_session_date(&date_cell.to_text())?;

    let hours = cell(ScheduleColumns::HOURS)
        .to_number()
        .unwrap_or(DEFAULT_HOURS);

    let notes_cell = cell(ScheduleColumns::NOTES);
    let notes = if notes_cell.is_blank() {
        String::new()
    } else {
        notes_cell.to_text()
    };

    Ok((date, hours, notes))
}
