use axum::{extract::State, Json};
use serde::Serialize;

use super::exercises::ExercisesState;
use crate::error::Result;
use crate::version::GIT_VERSION;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    git_version: &'static str,
    exercises: i64,
}

/// Also proves the database answers: a failing count is a 500.
pub async fn health_check(State(state): State<ExercisesState>) -> Result<Json<HealthResponse>> {
    let exercises = state.exercise_repo.count().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        git_version: GIT_VERSION,
        exercises,
    }))
}
