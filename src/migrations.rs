//! Embedded database migrations
//!
//! SQL files are compiled into the binary so the server does not need the
//! `migrations/` directory at runtime.

use anyhow::Context;

use crate::db::DbPool;

/// All migrations in order, each as (filename, sql_content)
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_create_members.sql",
        include_str!("../migrations/001_create_members.sql"),
    ),
    (
        "002_create_members_metrics.sql",
        include_str!("../migrations/002_create_members_metrics.sql"),
    ),
    (
        "003_create_exercises.sql",
        include_str!("../migrations/003_create_exercises.sql"),
    ),
    (
        "004_create_workouts.sql",
        include_str!("../migrations/004_create_workouts.sql"),
    ),
    (
        "005_create_gym_memberships.sql",
        include_str!("../migrations/005_create_gym_memberships.sql"),
    ),
    (
        "006_create_workout_logs.sql",
        include_str!("../migrations/006_create_workout_logs.sql"),
    ),
];

/// Run all pending migrations on the database pool.
///
/// Applied migrations are recorded in a `_migrations` table and skipped on
/// later runs.
pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let mut conn = pool.get()?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )?;

    let mut applied = 0;
    for (filename, sql) in MIGRATIONS {
        let done: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?",
            [filename],
            |row| row.get(0),
        )?;
        if done {
            continue;
        }

        tracing::info!("Applying migration {}", filename);

        // A failing file leaves no partial schema and no record behind
        let tx = conn.transaction()?;
        tx.execute_batch(sql)
            .with_context(|| format!("migration {} failed", filename))?;
        tx.execute("INSERT INTO _migrations (name) VALUES (?)", [filename])?;
        tx.commit()?;
        applied += 1;
    }

    tracing::info!("Schema up to date ({} migrations applied)", applied);
    Ok(())
}

/// Run every migration without tracking, for fresh in-memory test databases.
pub fn run_migrations_for_tests(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    for (_filename, sql) in MIGRATIONS {
        conn.execute_batch(sql)?;
    }

    Ok(())
}
