use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Credit count given to subjects created by an import
pub const DEFAULT_CREDITS: f64 = 2.0;

/// Session length used when a schedule row has no usable hours cell
pub const DEFAULT_HOURS: f64 = 2.0;

//==============================================================================
// Subjects
//==============================================================================

/// A subject as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub attendance_time: Option<String>,
    pub description: Option<String>,
    pub teacher_name: Option<String>,
    pub department: Option<String>,
    pub credits: Option<f64>,
    /// JSON capture of the whole workbook the subject was last imported from
    pub raw_workbook: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Fields for a subject created on first import
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubject {
    pub name: String,
    pub attendance_time: String,
    pub description: String,
    pub teacher_name: String,
    pub department: String,
    pub credits: f64,
    pub raw_workbook: String,
}

//==============================================================================
// Schedule entries
//==============================================================================

/// One scheduled session of a subject. (subject_id, date) is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScheduleEntry {
    pub id: i64,
    pub subject_id: i64,
    pub date: NaiveDate,
    pub hours: f64,
    pub location: String,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewScheduleEntry {
    pub subject_id: i64,
    pub date: NaiveDate,
    pub hours: f64,
    pub location: String,
    pub notes: String,
}

//==============================================================================
// Import results
//==============================================================================

/// Result of one successful import call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ImportSummary {
    pub message: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub subjects_created: usize,
    pub schedules_created: usize,
    /// Sheet-2 rows that were skipped (blank or unparsable date)
    pub rows_skipped: usize,
    /// Non-fatal problems, e.g. a Sheet-2 storage failure
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}
