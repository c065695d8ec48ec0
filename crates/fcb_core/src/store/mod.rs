use std::path::{Path, PathBuf};

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::db;
use crate::domain::{FactCheckResult, StoredFactCheck};
use crate::error::AppError;
use crate::fact_checks;

/// Persistence seam used by the pipeline and the presentation layer.
pub trait RecordStore {
    fn save(&self, result: &FactCheckResult) -> Result<StoredFactCheck, AppError>;
    fn load_all(&self) -> Result<Vec<StoredFactCheck>, AppError>;
    /// Returns the number of records removed.
    fn clear(&self) -> Result<usize, AppError>;
}

/// SQLite-backed store. A connection is opened (and migrated) per call.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    db_path: PathBuf,
}

impl SqliteRecordStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        self.db_path.as_path()
    }

    /// Create the database file and apply migrations.
    pub fn init(&self) -> Result<(), AppError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::new("DB_PATH_FAILED", "Failed to create database directory")
                        .with_details(format!("path={}; err={}", parent.display(), e))
                })?;
            }
        }
        db::open_and_migrate(&self.db_path)?;
        tracing::info!(path = %self.db_path.display(), "record store initialized");
        Ok(())
    }
}

impl RecordStore for SqliteRecordStore {
    fn save(&self, result: &FactCheckResult) -> Result<StoredFactCheck, AppError> {
        let conn = db::open_and_migrate(&self.db_path)?;
        let created_at = now_rfc3339_utc()?;
        let stored = fact_checks::insert_fact_check(&conn, result, &created_at)?;
        tracing::info!(id = stored.id, claim = %result.claim, "fact-check saved");
        Ok(stored)
    }

    fn load_all(&self) -> Result<Vec<StoredFactCheck>, AppError> {
        let conn = db::open_and_migrate(&self.db_path)?;
        let all = fact_checks::list_fact_checks(&conn)?;
        tracing::info!(count = all.len(), "loaded fact-check history");
        Ok(all)
    }

    fn clear(&self) -> Result<usize, AppError> {
        let conn = db::open_and_migrate(&self.db_path)?;
        let removed = fact_checks::clear_fact_checks(&conn)?;
        tracing::info!(removed, "fact-check history cleared");
        Ok(removed)
    }
}

/// Current UTC time as RFC3339 with whole seconds, so stored values sort lexically.
pub fn now_rfc3339_utc() -> Result<String, AppError> {
    let now = OffsetDateTime::now_utc();
    let now = now.replace_nanosecond(0).unwrap_or(now);
    now.format(&Rfc3339).map_err(|e| {
        AppError::new("DB_TIME_FAILED", "Failed to format time").with_details(e.to_string())
    })
}
