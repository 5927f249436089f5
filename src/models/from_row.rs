use rusqlite::Row;

/// Builds a model from a `SELECT *` row; column names follow `migrations/`.
pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}
