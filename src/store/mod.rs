//! Repository seams used by the importer
//!
//! An import works against one [`ImportTransaction`] obtained from a
//! [`Store`]. Everything written through it is committed or rolled back as
//! a unit.

mod sqlite;

pub use sqlite::{SqliteStore, SqliteTransaction};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ImportResult;
use crate::types::{NewScheduleEntry, NewSubject, ScheduleEntry, Subject};

#[async_trait]
pub trait SubjectRepository: Send {
    /// Look a subject up by its exact name
    async fn find_subject_by_name(&mut self, name: &str) -> ImportResult<Option<Subject>>;

    /// Insert a subject and return its id
    async fn create_subject(&mut self, subject: &NewSubject) -> ImportResult<i64>;

    /// Replace the stored workbook capture of an existing subject
    async fn update_raw_workbook(&mut self, subject_id: i64, raw_workbook: &str)
        -> ImportResult<()>;
}

#[async_trait]
pub trait ScheduleRepository: Send {
    async fn find_schedule(
        &mut self,
        subject_id: i64,
        date: NaiveDate,
    ) -> ImportResult<Option<ScheduleEntry>>;

    /// Insert a schedule entry and return its id
    async fn create_schedule(&mut self, entry: &NewScheduleEntry) -> ImportResult<i64>;
}

/// One all-or-nothing unit of work, with named savepoints for partial rollback
#[async_trait]
pub trait ImportTransaction: SubjectRepository + ScheduleRepository + Sized {
    async fn savepoint(&mut self, name: &str) -> ImportResult<()>;

    async fn release_savepoint(&mut self, name: &str) -> ImportResult<()>;

    /// Undo everything since `savepoint(name)` and discard the savepoint
    async fn rollback_to_savepoint(&mut self, name: &str) -> ImportResult<()>;

    async fn commit(self) -> ImportResult<()>;

    async fn rollback(self) -> ImportResult<()>;
}

#[async_trait]
pub trait Store: Send + Sync {
    type Transaction: ImportTransaction;

    async fn begin(&self) -> ImportResult<Self::Transaction>;
}
