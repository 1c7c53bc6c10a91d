//! Attendance workbook importer
//!
//! Imports one subject and its schedule from an Excel workbook into the
//! attendance database.
//!
//! # Workbook layout
//!
//! - Sheet1 holds the subject's basic info at fixed cells (teacher, department,
//!   subject name, attendance time, schedule notes).
//! - Sheet2 (optional) holds one scheduled session per row after a header row,
//!   with dates written as `4月8日`.
//!
//! Uploads go through a byte-level pre-filter, then a workbook decoder, then
//! the two sheet parsers. Storage happens in a single transaction; repeated
//! imports of the same workbook are idempotent.
//!
//! # Example
//!
//! ```no_run
//! use attendance_import::core::WorkbookImporter;
//! use attendance_import::excel::Upload;
//! use attendance_import::store::SqliteStore;
//!
//! # async fn run() -> attendance_import::error::ImportResult<()> {
//! let store = SqliteStore::connect("sqlite://attendance.db").await?;
//! let importer = WorkbookImporter::new(store);
//!
//! let content = std::fs::read("mechanics.xlsx")?;
//! let summary = importer.import(&Upload::new("mechanics.xlsx", &content)).await?;
//!
//! println!("Subjects created: {}", summary.subjects_created);
//! println!("Schedules created: {}", summary.schedules_created);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{ErrorKind, ImportError, ImportResult};
pub use types::{ImportSummary, ScheduleEntry, Subject};
