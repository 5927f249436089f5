use chrono::Utc;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, WorkoutLog};

#[derive(Clone)]
pub struct WorkoutLogRepository {
    pool: DbPool,
}

impl WorkoutLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn append(&self, member_id: i64, workout_id: i64, time: i64) -> Result<WorkoutLog> {
        let pool = self.pool.clone();
        let logged_at = Utc::now();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO workout_logs (member_id, workout_id, time, logged_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![member_id, workout_id, time, logged_at],
            )?;
            Ok(WorkoutLog {
                log_id: conn.last_insert_rowid(),
                member_id,
                workout_id,
                time,
                logged_at,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Newest first.
    pub async fn find_by_member(&self, member_id: i64) -> Result<Vec<WorkoutLog>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workout_logs WHERE member_id = ? ORDER BY logged_at DESC, log_id DESC",
            )?;
            let logs = stmt
                .query_map([member_id], WorkoutLog::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(logs)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
