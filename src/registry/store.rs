use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::domain::{Applicant, ApplicantDraft, ApplicantType, ValidationError};

/// Failure taxonomy for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("applicant not found")]
    NotFound,
    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// Storage abstraction so the HTTP layer can be exercised in isolation.
#[async_trait]
pub trait ApplicantStore: Send + Sync {
    /// Validate a draft and persist it, assigning id and timestamp.
    async fn create(&self, draft: ApplicantDraft) -> Result<Applicant, StoreError>;
    /// Fetch a single record by id.
    async fn get(&self, id: &str) -> Result<Applicant, StoreError>;
    /// All records, newest application first.
    async fn list(&self) -> Result<Vec<Applicant>, StoreError>;
    /// Remove a record permanently; ids are never reassigned.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// SQLite-backed store.
///
/// Email uniqueness is a UNIQUE constraint on the table, so concurrent
/// creates with the same normalized email race inside the storage engine
/// and exactly one insert wins.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS applicants (\
        id TEXT PRIMARY KEY,\
        name TEXT NOT NULL,\
        email TEXT NOT NULL UNIQUE,\
        phone TEXT NOT NULL,\
        applicant_type TEXT NOT NULL,\
        skills TEXT NOT NULL,\
        experience TEXT NOT NULL DEFAULT '',\
        motivation TEXT NOT NULL,\
        applied_at TEXT NOT NULL\
    )";

const COLUMNS: &str =
    "id, name, email, phone, applicant_type, skills, experience, motivation, applied_at";

impl SqliteStore {
    /// Open (creating if necessary) the database at `url` and ensure the
    /// applicants table exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new().max_connections(5).connect(url).await?;
        Self::from_pool(pool).await
    }

    /// A private in-memory database, used by tests and demos.
    pub async fn in_memory() -> Result<Self, StoreError> {
        // A second pooled connection would see a different empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl ApplicantStore for SqliteStore {
    async fn create(&self, draft: ApplicantDraft) -> Result<Applicant, StoreError> {
        let valid = draft.validate()?;

        let applicant = Applicant {
            id: Uuid::new_v4().to_string(),
            name: valid.name,
            email: valid.email,
            phone: valid.phone,
            applicant_type: valid.applicant_type,
            skills: valid.skills,
            experience: valid.experience,
            motivation: valid.motivation,
            // Truncated to the precision the column holds, so the record
            // returned here equals the one any later read yields.
            applied_at: Utc::now().trunc_subsecs(6),
        };

        let insert = sqlx::query(
            "INSERT INTO applicants (id, name, email, phone, applicant_type, skills, experience, motivation, applied_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&applicant.id)
        .bind(&applicant.name)
        .bind(&applicant.email)
        .bind(&applicant.phone)
        .bind(applicant.applicant_type.label())
        .bind(&applicant.skills)
        .bind(&applicant.experience)
        .bind(&applicant.motivation)
        .bind(encode_timestamp(applicant.applied_at))
        .execute(&self.pool)
        .await;

        match insert {
            Ok(_) => Ok(applicant),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateEmail),
            Err(err) => Err(StoreError::Unavailable(err)),
        }
    }

    async fn get(&self, id: &str) -> Result<Applicant, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM applicants WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => applicant_from_row(&row),
            None => Err(StoreError::NotFound),
        }
    }

    async fn list(&self) -> Result<Vec<Applicant>, StoreError> {
        // rowid breaks ties between submissions in the same instant.
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM applicants ORDER BY applied_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(applicant_from_row).collect()
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let outcome = sqlx::query("DELETE FROM applicants WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if outcome.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// RFC 3339 with fixed precision so lexical order matches chronological.
fn encode_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn applicant_from_row(row: &SqliteRow) -> Result<Applicant, StoreError> {
    let raw_type: String = row.try_get("applicant_type")?;
    let applicant_type = ApplicantType::parse(&raw_type)
        .ok_or_else(|| StoreError::Corrupt(format!("unknown applicant type '{raw_type}'")))?;

    let raw_applied: String = row.try_get("applied_at")?;
    let applied_at = DateTime::parse_from_rfc3339(&raw_applied)
        .map_err(|err| StoreError::Corrupt(format!("bad applied_at '{raw_applied}': {err}")))?
        .with_timezone(&Utc);

    Ok(Applicant {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        applicant_type,
        skills: row.try_get("skills")?,
        experience: row.try_get("experience")?,
        motivation: row.try_get("motivation")?,
        applied_at,
    })
}
