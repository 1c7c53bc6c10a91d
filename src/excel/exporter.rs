//! Template exporter: a downloadable workbook in the layout the importer reads

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use super::basic_info::{BasicInfoLayout, CellPos};
use super::schedule::ScheduleColumns;
use crate::error::{ImportError, ImportResult};

pub const TEMPLATE_FILENAME: &str = "attendance_template.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const BASIC_INFO_SHEET: &str = "基本情報";
pub const SCHEDULE_SHEET: &str = "スケジュール";

/// Sheet2 header row; positions line up with [`ScheduleColumns`]
pub const SCHEDULE_HEADERS: [&str; 7] = ["回", "出講日", "曜日", "時限", "内容", "時間数", "備考"];

/// Example sessions written to the template: (date, weekday, period, topic, hours, notes)
const EXAMPLE_SESSIONS: [(&str, &str, &str, &str, f64, &str); 4] = [
    ("4月8日", "月", "1", "ガイダンス", 1.5, "第1回"),
    ("4月15日", "月", "1", "運動方程式", 1.5, "第2回"),
    ("4月22日", "月", "1", "仕事とエネルギー", 1.5, "第3回"),
    ("1月20日", "月", "1", "期末試験", 2.0, "試験"),
];

/// Build the template workbook and return its bytes
pub fn build_template() -> ImportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let basic = workbook.add_worksheet();
    write_basic_info_sheet(basic, &bold).map_err(export_error)?;

    let schedule = workbook.add_worksheet();
    write_schedule_sheet(schedule, &bold).map_err(export_error)?;

    workbook.save_to_buffer().map_err(export_error)
}

fn export_error(err: XlsxError) -> ImportError {
    ImportError::Export(err.to_string())
}

fn write_basic_info_sheet(sheet: &mut Worksheet, bold: &Format) -> Result<(), XlsxError> {
    sheet.set_name(BASIC_INFO_SHEET)?;

    // Labels sit one column left of each value cell
    let fields: [(CellPos, &str, &str); 6] = [
        (BasicInfoLayout::TEACHER_NAME, "担当教員", "田中先生"),
        (BasicInfoLayout::DEPARTMENT, "学部", "理工学部"),
        (BasicInfoLayout::SUBJECT_NAME, "科目名", "力学"),
        (BasicInfoLayout::SCHEDULE_INFO_1, "日程", "月曜1限"),
        (BasicInfoLayout::SCHEDULE_INFO_2, "教室", "A101"),
        (BasicInfoLayout::ATTENDANCE_TIME, "授業時間", "9:00-10:30"),
    ];

    for (pos, label, value) in fields {
        let (row, col) = (pos.row as u32, pos.col as u16);
        sheet.write_string_with_format(row, col - 1, label, bold)?;
        sheet.write_string(row, col, value)?;
    }
    sheet.set_column_width(1, 16)?;
    sheet.set_column_width(3, 16)?;
    Ok(())
}

fn write_schedule_sheet(sheet: &mut Worksheet, bold: &Format) -> Result<(), XlsxError> {
    sheet.set_name(SCHEDULE_SHEET)?;

    for (col, header) in SCHEDULE_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, bold)?;
    }

    for (idx, (date, weekday, period, topic, hours, notes)) in EXAMPLE_SESSIONS.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_number(row, 0, (idx + 1) as f64)?;
        sheet.write_string(row, ScheduleColumns::DATE as u16, *date)?;
        sheet.write_string(row, 2, *weekday)?;
        sheet.write_string(row, 3, *period)?;
        sheet.write_string(row, 4, *topic)?;
        sheet.write_number(row, ScheduleColumns::HOURS as u16, *hours)?;
        sheet.write_string(row, ScheduleColumns::NOTES as u16, *notes)?;
    }
    sheet.set_column_width(4, 20)?;
    Ok(())
}

/// Number of example sessions the template carries
pub fn template_session_count() -> usize {
    EXAMPLE_SESSIONS.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::{CalamineDecoder, WorkbookDecoder, WorkbookFormat};

    #[test]
    fn test_template_is_a_zip_container() {
        let bytes = build_template().unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn test_template_sheets_follow_import_layout() {
        let bytes = build_template().unwrap();
        let loaded = CalamineDecoder.decode(&bytes, WorkbookFormat::Xlsx).unwrap();

        assert_eq!(loaded.sheets.len(), 2);
        assert_eq!(loaded.sheets[0].name, BASIC_INFO_SHEET);
        assert_eq!(loaded.sheets[1].name, SCHEDULE_SHEET);

        let basic = &loaded.sheets[0];
        let pos = BasicInfoLayout::SUBJECT_NAME;
        assert_eq!(basic.cell(pos.row, pos.col).to_text(), "力学");

        let schedule = &loaded.sheets[1];
        assert_eq!(schedule.height(), template_session_count() + 1);
        assert_eq!(schedule.cell(1, ScheduleColumns::DATE).to_text(), "4月8日");
    }
}
