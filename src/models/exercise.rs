use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// Catalog entry. Read-only over HTTP; rows come from the seed file or are
/// loaded externally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub title: String,
    pub equipment: String,
    pub difficulty: String,
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            equipment: row.get("equipment")?,
            difficulty: row.get("difficulty")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExercise {
    pub title: String,
    pub equipment: String,
    pub difficulty: String,
}
