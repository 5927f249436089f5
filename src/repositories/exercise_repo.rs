use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{Exercise, FromSqliteRow, NewExercise};

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM exercises", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Bulk insert used by catalog seeding. Returns the number of rows added.
    pub async fn insert_many(&self, exercises: Vec<NewExercise>) -> Result<usize> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO exercises (title, equipment, difficulty) VALUES (?, ?, ?)",
                )?;
                for exercise in &exercises {
                    stmt.execute(rusqlite::params![
                        exercise.title,
                        exercise.equipment,
                        exercise.difficulty
                    ])?;
                }
            }
            tx.commit()?;
            Ok(exercises.len())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_page(&self, limit: i64, offset: i64) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM exercises ORDER BY id LIMIT ? OFFSET ?")?;
            let exercises = stmt
                .query_map([limit, offset], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Catalog rows for the given ids, in id order. Unknown ids are ignored.
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Exercise>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let pool = self.pool.clone();
        let ids = serde_json::to_string(ids).map_err(|e| AppError::Internal(e.to_string()))?;
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT id, title, equipment, difficulty FROM exercises
                 WHERE id IN (SELECT value FROM json_each(?))
                 ORDER BY id",
            )?;
            let exercises = stmt
                .query_map([&ids], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Case-insensitive substring match on the title. `%` and `_` in the
    /// query are matched literally.
    pub async fn search_by_title(&self, query: &str) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        let pattern = format!("%{}%", escape_like(query));
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM exercises WHERE title LIKE ? ESCAPE '\\' ORDER BY title, id",
            )?;
            let exercises = stmt
                .query_map([&pattern], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
