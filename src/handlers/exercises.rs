use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::extract::JsonBody;
use crate::middleware::Credentials;
use crate::models::{AttachExercises, Exercise, WorkoutCreated};
use crate::repositories::{ExerciseRepository, MemberRepository, WorkoutRepository};

/// Fixed catalog page size.
pub const PAGE_SIZE: i64 = 50;

#[derive(Clone)]
pub struct ExercisesState {
    pub member_repo: MemberRepository,
    pub exercise_repo: ExerciseRepository,
    pub workout_repo: WorkoutRepository,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    workout_id: Option<String>,
    q: Option<String>,
}

pub async fn list(
    State(state): State<ExercisesState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Exercise>>> {
    // Unparsable or non-positive pages fall back to the first one
    let page = query
        .page
        .and_then(|p| p.trim().parse::<i64>().ok())
        .unwrap_or(1)
        .max(1);
    let offset = (page - 1).saturating_mul(PAGE_SIZE);

    let exercises = state.exercise_repo.find_page(PAGE_SIZE, offset).await?;
    if exercises.is_empty() {
        return Err(AppError::NotFound("No exercises found".to_string()));
    }

    Ok(Json(exercises))
}

/// Two lookups share this route: `workoutId` returns the exercises of one
/// workout, `q` matches titles. `workoutId` wins when both are given.
pub async fn search(
    State(state): State<ExercisesState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Exercise>>> {
    if let Some(raw_id) = query.workout_id {
        let workout_id: i64 = raw_id
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid workoutId".to_string()))?;

        let workout = state
            .workout_repo
            .find_by_id(workout_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No exercises found for this workout".to_string()))?;

        let exercises = state.exercise_repo.find_by_ids(&workout.exercise_ids).await?;
        return Ok(Json(exercises));
    }

    match query.q {
        Some(q) => Ok(Json(state.exercise_repo.search_by_title(&q).await?)),
        None => Err(AppError::BadRequest(
            "Either workoutId or q is required".to_string(),
        )),
    }
}

/// `POST /exercises`: records an unnamed workout made of the given exercises.
pub async fn attach_exercises(
    State(state): State<ExercisesState>,
    credentials: Credentials,
    JsonBody(form): JsonBody<AttachExercises>,
) -> Result<Response> {
    let member = credentials
        .authorize_optional(&state.member_repo, form.member_id)
        .await?;

    let exercise_ids = form
        .exercise_ids
        .ok_or_else(|| AppError::BadRequest("Invalid input data".to_string()))?;

    let workout_id = state
        .workout_repo
        .create(member.member_id, "", &exercise_ids)
        .await?;

    tracing::info!("Created workout {} for member {}", workout_id, member.member_id);
    Ok((StatusCode::CREATED, Json(WorkoutCreated { workout_id })).into_response())
}
