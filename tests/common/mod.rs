//! Workbook builders shared by the integration tests
#![allow(dead_code)]

use rust_xlsxwriter::Workbook;

/// One Sheet2 row: date text (empty = blank cell), hours, notes
pub struct Session<'a> {
    pub date: &'a str,
    pub hours: Option<f64>,
    pub notes: &'a str,
}

pub fn session<'a>(date: &'a str, hours: Option<f64>, notes: &'a str) -> Session<'a> {
    Session { date, hours, notes }
}

/// Sheet1 contents at the fixed basic-info cells
pub struct BasicInfoCells<'a> {
    pub teacher: &'a str,
    pub department: &'a str,
    pub subject: &'a str,
    pub attendance_time: &'a str,
}

impl<'a> BasicInfoCells<'a> {
    pub fn subject(subject: &'a str) -> Self {
        Self {
            teacher: "Dr. Smith",
            department: "Physics",
            subject,
            attendance_time: "9:00-10:30",
        }
    }
}

/// Build an .xlsx with Sheet1 basic info and, when `sessions` is given, a Sheet2 schedule
pub fn build_workbook(info: &BasicInfoCells<'_>, sessions: Option<&[Session<'_>]>) -> Vec<u8> {
    let mut workbook = Workbook::new();

    let sheet1 = workbook.add_worksheet();
    sheet1.write_string(0, 0, "Teacher").unwrap();
    sheet1.write_string(0, 1, info.teacher).unwrap();
    sheet1.write_string(0, 3, "Mon 1st period").unwrap();
    sheet1.write_string(1, 0, "Department").unwrap();
    sheet1.write_string(1, 1, info.department).unwrap();
    sheet1.write_string(1, 3, "Room A101").unwrap();
    sheet1.write_string(2, 0, "Subject").unwrap();
    if !info.subject.is_empty() {
        sheet1.write_string(2, 1, info.subject).unwrap();
    }
    sheet1.write_string(2, 2, "Time").unwrap();
    sheet1.write_string(2, 3, info.attendance_time).unwrap();

    if let Some(sessions) = sessions {
        let sheet2 = workbook.add_worksheet();
        for (col, header) in ["No", "Date", "Day", "Period", "Topic", "Hours", "Notes"]
            .iter()
            .enumerate()
        {
            sheet2.write_string(0, col as u16, *header).unwrap();
        }
        for (idx, s) in sessions.iter().enumerate() {
            let row = (idx + 1) as u32;
            sheet2.write_number(row, 0, (idx + 1) as f64).unwrap();
            if !s.date.is_empty() {
                sheet2.write_string(row, 1, s.date).unwrap();
            }
            if let Some(hours) = s.hours {
                sheet2.write_number(row, 5, hours).unwrap();
            }
            if !s.notes.is_empty() {
                sheet2.write_string(row, 6, s.notes).unwrap();
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// The Mechanics example: three usable sessions, one "TBD" row and one blank-date row
pub fn mechanics_workbook() -> Vec<u8> {
    build_workbook(
        &BasicInfoCells::subject("Mechanics"),
        Some(&[
            session("4月8日", Some(1.5), "Guidance"),
            session("4月15日", None, ""),
            session("TBD", Some(1.0), "to be decided"),
            session("", None, "no date here"),
            session("2月3日", Some(2.0), "Final exam"),
        ]),
    )
}
