use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, Workout};

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Returns the new workout id.
    pub async fn create(&self, member_id: i64, name: &str, exercise_ids: &[i64]) -> Result<i64> {
        let pool = self.pool.clone();
        let name = name.to_string();
        let exercise_ids =
            serde_json::to_string(exercise_ids).map_err(|e| AppError::Internal(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO workouts (member_id, workout_name, exercise_ids) VALUES (?, ?, ?)",
                rusqlite::params![member_id, name, exercise_ids],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, workout_id: i64) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workouts WHERE workout_id = ?")?;
            let result = stmt.query_row([workout_id], Workout::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Like [`find_by_id`](Self::find_by_id) but only if `member_id` owns it.
    pub async fn find_owned(&self, workout_id: i64, member_id: i64) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt =
                conn.prepare("SELECT * FROM workouts WHERE workout_id = ? AND member_id = ?")?;
            let result = stmt
                .query_row([workout_id, member_id], Workout::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_member(&self, member_id: i64) -> Result<Vec<Workout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt =
                conn.prepare("SELECT * FROM workouts WHERE member_id = ? ORDER BY workout_id")?;
            let workouts = stmt
                .query_map([member_id], Workout::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workouts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn rename(&self, workout_id: i64, member_id: i64, new_name: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let new_name = new_name.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE workouts SET workout_name = ? WHERE workout_id = ? AND member_id = ?",
                rusqlite::params![new_name, workout_id, member_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, workout_id: i64, member_id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM workouts WHERE workout_id = ? AND member_id = ?",
                [workout_id, member_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
