//! SQLite store (sqlx)

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info};

use super::{ImportTransaction, ScheduleRepository, Store, SubjectRepository};
use crate::error::ImportResult;
use crate::types::{NewScheduleEntry, NewSubject, ScheduleEntry, Subject};

const SUBJECT_COLUMNS: &str = r#"
    subject_id AS id,
    subject_name AS name,
    attendance_time,
    description,
    teacher_name,
    department,
    credits,
    excel_data AS raw_workbook,
    created_at
"#;

const SCHEDULE_COLUMNS: &str = r#"
    schedule_id AS id,
    subject_id,
    schedule_date AS date,
    hours,
    location,
    notes,
    created_at
"#;

/// Pooled SQLite database holding subjects and their schedules
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and apply migrations
    pub async fn connect(url: &str) -> ImportResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        info!(url, "connected to database");
        Self::from_pool(pool).await
    }

    /// Private in-memory database; lives as long as the store
    pub async fn in_memory() -> ImportResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(Option::<Duration>::None)
            .max_lifetime(Option::<Duration>::None)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> ImportResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ping(&self) -> ImportResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn find_subject(&self, name: &str) -> ImportResult<Option<Subject>> {
        let sql = format!(
            "SELECT {} FROM subject WHERE subject_name = ? ORDER BY subject_id LIMIT 1",
            SUBJECT_COLUMNS
        );
        let subject = sqlx::query_as::<_, Subject>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(subject)
    }

    /// Schedule entries of a subject in date order
    pub async fn schedules_for_subject(&self, subject_id: i64) -> ImportResult<Vec<ScheduleEntry>> {
        let sql = format!(
            "SELECT {} FROM subject_schedule WHERE subject_id = ? ORDER BY schedule_date",
            SCHEDULE_COLUMNS
        );
        let entries = sqlx::query_as::<_, ScheduleEntry>(&sql)
            .bind(subject_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }

    pub async fn count_subjects(&self) -> ImportResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subject")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn count_schedules(&self) -> ImportResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subject_schedule")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}

#[async_trait]
impl Store for SqliteStore {
    type Transaction = SqliteTransaction;

    async fn begin(&self) -> ImportResult<SqliteTransaction> {
        let tx = self.pool.begin().await?;
        Ok(SqliteTransaction { tx })
    }
}

/// An open SQLite transaction; dropping it without commit rolls back
pub struct SqliteTransaction {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl SubjectRepository for SqliteTransaction {
    async fn find_subject_by_name(&mut self, name: &str) -> ImportResult<Option<Subject>> {
        let sql = format!(
            "SELECT {} FROM subject WHERE subject_name = ? ORDER BY subject_id LIMIT 1",
            SUBJECT_COLUMNS
        );
        let subject = sqlx::query_as::<_, Subject>(&sql)
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(subject)
    }

    async fn create_subject(&mut self, subject: &NewSubject) -> ImportResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO subject
                (subject_name, attendance_time, description, teacher_name,
                 department, credits, excel_data, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&subject.name)
        .bind(&subject.attendance_time)
        .bind(&subject.description)
        .bind(&subject.teacher_name)
        .bind(&subject.department)
        .bind(subject.credits)
        .bind(&subject.raw_workbook)
        .bind(Utc::now().naive_utc())
        .execute(&mut *self.tx)
        .await?;

        let id = result.last_insert_rowid();
        debug!(subject_id = id, name = %subject.name, "inserted subject");
        Ok(id)
    }

    async fn update_raw_workbook(
        &mut self,
        subject_id: i64,
        raw_workbook: &str,
    ) -> ImportResult<()> {
        sqlx::query("UPDATE subject SET excel_data = ? WHERE subject_id = ?")
            .bind(raw_workbook)
            .bind(subject_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ScheduleRepository for SqliteTransaction {
    async fn find_schedule(
        &mut self,
        subject_id: i64,
        date: NaiveDate,
    ) -> ImportResult<Option<ScheduleEntry>> {
        let sql = format!(
            "SELECT {} FROM subject_schedule WHERE subject_id = ? AND schedule_date = ?",
            SCHEDULE_COLUMNS
        );
        let entry = sqlx::query_as::<_, ScheduleEntry>(&sql)
            .bind(subject_id)
            .bind(date)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(entry)
    }

    async fn create_schedule(&mut self, entry: &NewScheduleEntry) -> ImportResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO subject_schedule
                (subject_id, schedule_date, hours, location, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(entry.subject_id)
        .bind(entry.date)
        .bind(entry.hours)
        .bind(&entry.location)
        .bind(&entry.notes)
        .bind(Utc::now().naive_utc())
        .execute(&mut *self.tx)
        .await?;
        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl ImportTransaction for SqliteTransaction {
    async fn savepoint(&mut self, name: &str) -> ImportResult<()> {
        sqlx::query(&format!("SAVEPOINT {}", name))
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn release_savepoint(&mut self, name: &str) -> ImportResult<()> {
        sqlx::query(&format!("RELEASE SAVEPOINT {}", name))
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn rollback_to_savepoint(&mut self, name: &str) -> ImportResult<()> {
        sqlx::query(&format!("ROLLBACK TO SAVEPOINT {}", name))
            .execute(&mut *self.tx)
            .await?;
        self.release_savepoint(name).await
    }

    async fn commit(self) -> ImportResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> ImportResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_subject(name: &str) -> NewSubject {
        NewSubject {
            name: name.to_string(),
            attendance_time: "9:00-10:30".to_string(),
            description: String::new(),
            teacher_name: "Smith".to_string(),
            department: "Physics".to_string(),
            credits: 2.0,
            raw_workbook: "{}".to_string(),
        }
    }

    #[tokio::test]
    async fn test_subject_roundtrip_and_commit() {
        let store = SqliteStore::in_memory().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let id = tx.create_subject(&new_subject("Mechanics")).await.unwrap();
        let found = tx.find_subject_by_name("Mechanics").await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.credits, Some(2.0));
        tx.commit().await.unwrap();

        let subject = store.find_subject("Mechanics").await.unwrap().unwrap();
        assert_eq!(subject.teacher_name.as_deref(), Some("Smith"));
        assert_eq!(subject.raw_workbook.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let store = SqliteStore::in_memory().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.create_subject(&new_subject("Optics")).await.unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(store.count_subjects().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_savepoint_rollback_keeps_earlier_writes() {
        let store = SqliteStore::in_memory().await.unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 4, 8).unwrap();

        let mut tx = store.begin().await.unwrap();
        let subject_id = tx.create_subject(&new_subject("Mechanics")).await.unwrap();
        tx.savepoint("sheet2").await.unwrap();
        tx.create_schedule(&NewScheduleEntry {
            subject_id,
            date,
            hours: 1.5,
            location: String::new(),
            notes: String::new(),
        })
        .await
        .unwrap();
        assert!(tx.find_schedule(subject_id, date).await.unwrap().is_some());
        tx.rollback_to_savepoint("sheet2").await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.count_subjects().await.unwrap(), 1);
        assert_eq!(store.count_schedules().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_schedule_date_is_unique_per_subject() {
        let store = SqliteStore::in_memory().await.unwrap();
        let entry = |subject_id| NewScheduleEntry {
            subject_id,
            date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            hours: 2.0,
            location: String::new(),
            notes: "x".to_string(),
        };

        let mut tx = store.begin().await.unwrap();
        let subject_id = tx.create_subject(&new_subject("Mechanics")).await.unwrap();
        tx.create_schedule(&entry(subject_id)).await.unwrap();
        assert!(tx.create_schedule(&entry(subject_id)).await.is_err());
    }
}
