//! Workbook reading for subject/schedule imports
//!
//! Pipeline: upload pre-filter → decoder → whole-workbook capture →
//! Sheet1 basic info → Sheet2 schedule rows. Everything here is pure; the
//! storage side lives in [`crate::core::WorkbookImporter`].

mod basic_info;
mod cells;
mod exporter;
mod importer;
mod schedule;
mod upload;

pub use basic_info::{BasicInfo, BasicInfoLayout, CellPos, UNKNOWN_SUBJECT};
pub use cells::{CellValue, LoadedWorkbook, Sheet};
pub use exporter::{
    build_template, template_session_count, BASIC_INFO_SHEET, SCHEDULE_HEADERS, SCHEDULE_SHEET,
    TEMPLATE_FILENAME, XLSX_CONTENT_TYPE,
};
pub use importer::{CalamineDecoder, WorkbookDecoder};
pub use schedule::{
    AcademicYear, ParsedSchedule, ScheduleColumns, ScheduleRow, SkipReason, SkippedRow,
};
pub use upload::{validate_upload, Upload, WorkbookFormat, MAX_UPLOAD_BYTES};

use tracing::debug;

use crate::error::{ImportError, ImportResult};

/// Everything an import needs from a workbook, before touching storage
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedWorkbook {
    pub format: WorkbookFormat,
    /// JSON capture of every sheet
    pub raw_workbook: String,
    pub sheet_names: Vec<String>,
    pub basic_info: BasicInfo,
    /// `None` when the workbook has no second sheet
    pub schedule: Option<ParsedSchedule>,
}

/// Validate, decode and parse an upload.
///
/// Fails on format problems, an empty workbook or an unusable Sheet1.
/// Sheet2 rows never cause a failure; they are either parsed or skipped.
pub fn parse_upload<D: WorkbookDecoder + ?Sized>(
    upload: &Upload<'_>,
    decoder: &D,
    max_upload_bytes: usize,
    year: AcademicYear,
) -> ImportResult<ParsedWorkbook> {
    let format = validate_upload(upload, max_upload_bytes)?;
    let workbook = decoder.decode(upload.content, format)?;

    let first = workbook.sheet(0).ok_or(ImportError::NoSheets)?;
    let raw_workbook = workbook.capture_json()?;
    debug!(
        filename = upload.filename,
        sheets = workbook.sheets.len(),
        raw_len = raw_workbook.len(),
        "captured workbook"
    );

    let basic_info = BasicInfo::extract(first)?;
    let schedule = workbook
        .sheet(1)
        .map(|sheet| ParsedSchedule::parse(sheet, year));

    Ok(ParsedWorkbook {
        format,
        raw_workbook,
        sheet_names: workbook.sheets.iter().map(|s| s.name.clone()).collect(),
        basic_info,
        schedule,
    })
}
