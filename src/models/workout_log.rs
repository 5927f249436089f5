use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// A completed session. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub log_id: i64,
    pub member_id: i64,
    pub workout_id: i64,
    /// Elapsed seconds.
    pub time: i64,
    pub logged_at: DateTime<Utc>,
}

impl FromSqliteRow for WorkoutLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            log_id: row.get("log_id")?,
            member_id: row.get("member_id")?,
            workout_id: row.get("workout_id")?,
            time: row.get("time")?,
            logged_at: row.get("logged_at")?,
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutLog {
    pub member_id: Option<i64>,
    pub workout_id: Option<i64>,
    pub time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLogCreated {
    pub log_id: i64,
}
