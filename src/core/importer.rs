//! Workbook importer: parsed workbook → subject + schedule rows, in one transaction

use tracing::{info, warn};

use crate::error::ImportResult;
use crate::excel::{
    parse_upload, AcademicYear, CalamineDecoder, ParsedSchedule, ParsedWorkbook, Upload,
    WorkbookDecoder, MAX_UPLOAD_BYTES,
};
use crate::store::{ImportTransaction, Store};
use crate::types::{ImportSummary, NewScheduleEntry, NewSubject, DEFAULT_CREDITS};

/// Savepoint guarding the Sheet2 writes
const SCHEDULE_SAVEPOINT: &str = "schedule_sheet";

/// Import tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportConfig {
    /// Uploads larger than this are rejected
    pub max_upload_bytes: usize,
    /// Year assigned to `M月D日` schedule dates
    pub academic_year: AcademicYear,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: MAX_UPLOAD_BYTES,
            academic_year: AcademicYear::default(),
        }
    }
}

/// Imports subject workbooks into a [`Store`]
pub struct WorkbookImporter<S, D = CalamineDecoder> {
    store: S,
    decoder: D,
    config: ImportConfig,
}

impl<S: Store> WorkbookImporter<S, CalamineDecoder> {
    pub fn new(store: S) -> Self {
        Self::with_decoder(store, CalamineDecoder)
    }
}

impl<S: Store, D: WorkbookDecoder> WorkbookImporter<S, D> {
    pub fn with_decoder(store: S, decoder: D) -> Self {
        Self {
            store,
            decoder,
            config: ImportConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Parse an upload without writing anything
    pub fn parse(&self, upload: &Upload<'_>) -> ImportResult<ParsedWorkbook> {
        parse_upload(
            upload,
            &self.decoder,
            self.config.max_upload_bytes,
            self.config.academic_year,
        )
    }

    /// Import one workbook.
    ///
    /// All writes happen in a single transaction. Format and Sheet1 failures
    /// leave nothing behind; a failure while storing Sheet2 rows is rolled
    /// back on its own and reported as a warning.
    pub async fn import(&self, upload: &Upload<'_>) -> ImportResult<ImportSummary> {
        let parsed = self.parse(upload)?;

        let mut tx = self.store.begin().await?;
        match apply(&mut tx, &parsed).await {
            Ok(summary) => {
                tx.commit().await?;
                info!(
                    subject = %summary.subject_name,
                    subjects_created = summary.subjects_created,
                    schedules_created = summary.schedules_created,
                    rows_skipped = summary.rows_skipped,
                    "workbook imported"
                );
                Ok(summary)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

async fn apply<T: ImportTransaction>(
    tx: &mut T,
    parsed: &ParsedWorkbook,
) -> ImportResult<ImportSummary> {
    let info = &parsed.basic_info;

    let (subject_id, subjects_created) = match tx.find_subject_by_name(&info.subject_name).await? {
        Some(existing) => {
            tx.update_raw_workbook(existing.id, &parsed.raw_workbook)
                .await?;
            (existing.id, 0)
        }
        None => {
            let id = tx
                .create_subject(&NewSubject {
                    name: info.subject_name.clone(),
                    attendance_time: info.attendance_time.clone(),
                    description: info.description.clone(),
                    teacher_name: info.teacher_name.clone(),
                    department: info.department.clone(),
                    credits: DEFAULT_CREDITS,
                    raw_workbook: parsed.raw_workbook.clone(),
                })
                .await?;
            (id, 1)
        }
    };

    let mut summary = ImportSummary {
        message: "Import completed".to_string(),
        subject_id,
        subject_name: info.subject_name.clone(),
        subjects_created,
        ..Default::default()
    };

    if let Some(schedule) = &parsed.schedule {
        summary.rows_skipped = schedule.skipped.len();

        tx.savepoint(SCHEDULE_SAVEPOINT).await?;
        match store_schedule(tx, subject_id, schedule).await {
            Ok(created) => {
                tx.release_savepoint(SCHEDULE_SAVEPOINT).await?;
                summary.schedules_created = created;
            }
            Err(err) => {
                warn!(subject_id, error = %err, "Sheet2 processing failed; schedules not imported");
                tx.rollback_to_savepoint(SCHEDULE_SAVEPOINT).await?;
                summary
                    .warnings
                    .push(format!("Sheet2 schedules were not imported: {}", err));
            }
        }
    }

    Ok(summary)
}

/// Create the schedule entries that do not exist yet; returns how many were created
async fn store_schedule<T: ImportTransaction>(
    tx: &mut T,
    subject_id: i64,
    schedule: &ParsedSchedule,
) -> ImportResult<usize> {
    let mut created = 0;
    for row in &schedule.rows {
        if tx.find_schedule(subject_id, row.date).await?.is_some() {
            continue;
        }
        tx.create_schedule(&NewScheduleEntry {
            subject_id,
            date: row.date,
            hours: row.hours,
            location: String::new(),
            notes: row.notes.clone(),
        })
        .await?;
        created += 1;
    }
    Ok(created)
}
