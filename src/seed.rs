//! Loads the exercise catalog from a JSON file into an empty database.

use std::path::Path;

use anyhow::Context;

use crate::models::NewExercise;
use crate::repositories::ExerciseRepository;

/// Inserts every entry of `path` when the catalog is empty and returns how
/// many rows were added. A non-empty catalog is left alone.
pub async fn seed_exercises(repo: &ExerciseRepository, path: &Path) -> anyhow::Result<usize> {
    if repo.count().await? > 0 {
        tracing::debug!("Exercise catalog already populated, skipping seed");
        return Ok(0);
    }

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading exercise seed {}", path.display()))?;
    let exercises: Vec<NewExercise> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing exercise seed {}", path.display()))?;

    let added = repo.insert_many(exercises).await?;
    tracing::info!("Seeded {} exercises from {}", added, path.display());
    Ok(added)
}
