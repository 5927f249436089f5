use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::extract::JsonBody;
use crate::middleware::Credentials;
use crate::models::member::present;
use crate::models::{
    CreateWorkout, CreateWorkoutLog, DetailedWorkout, RenameWorkout, Workout,
    WorkoutLog, WorkoutLogCreated,
};
use crate::repositories::{
    ExerciseRepository, MemberRepository, WorkoutLogRepository, WorkoutRepository,
};

#[derive(Clone)]
pub struct WorkoutsState {
    pub member_repo: MemberRepository,
    pub workout_repo: WorkoutRepository,
    pub exercise_repo: ExerciseRepository,
    pub log_repo: WorkoutLogRepository,
}

fn workout_not_found() -> AppError {
    AppError::NotFound("Workout not found".to_string())
}

pub async fn list(
    State(state): State<WorkoutsState>,
    Path(member_id): Path<i64>,
    credentials: Credentials,
) -> Result<Json<Vec<Workout>>> {
    credentials.authorize(&state.member_repo, member_id).await?;

    let workouts = state.workout_repo.find_by_member(member_id).await?;
    tracing::debug!("Fetched {} workouts for member {}", workouts.len(), member_id);
    Ok(Json(workouts))
}

pub async fn create(
    State(state): State<WorkoutsState>,
    Path(member_id): Path<i64>,
    credentials: Credentials,
    JsonBody(form): JsonBody<CreateWorkout>,
) -> Result<&'static str> {
    credentials.authorize(&state.member_repo, member_id).await?;

    let name = present(&form.workout_name);
    let exercise_ids = form.exercise_ids.filter(|ids| !ids.is_empty());
    let (Some(name), Some(exercise_ids)) = (name, exercise_ids) else {
        tracing::warn!("Rejected workout for member {}: missing fields", member_id);
        return Err(AppError::Validation("Missing required fields".to_string()));
    };

    let workout_id = state
        .workout_repo
        .create(member_id, &name, &exercise_ids)
        .await?;

    tracing::info!("Created workout {} for member {}", workout_id, member_id);
    Ok("Workout created successfully")
}

pub async fn rename(
    State(state): State<WorkoutsState>,
    Path(workout_id): Path<i64>,
    credentials: Credentials,
    JsonBody(form): JsonBody<RenameWorkout>,
) -> Result<&'static str> {
    let member = credentials.authorize_header(&state.member_repo).await?;

    let new_name = present(&form.new_name).ok_or_else(|| {
        AppError::Validation("Workout ID and new name are required".to_string())
    })?;

    if !state
        .workout_repo
        .rename(workout_id, member.member_id, &new_name)
        .await?
    {
        return Err(workout_not_found());
    }

    tracing::info!("Renamed workout {}", workout_id);
    Ok("Workout renamed successfully")
}

pub async fn delete(
    State(state): State<WorkoutsState>,
    Path(workout_id): Path<i64>,
    credentials: Credentials,
) -> Result<&'static str> {
    let member = credentials.authorize_header(&state.member_repo).await?;

    if !state.workout_repo.delete(workout_id, member.member_id).await? {
        return Err(workout_not_found());
    }

    tracing::info!("Deleted workout {}", workout_id);
    Ok("Workout deleted successfully")
}

pub async fn detailed(
    State(state): State<WorkoutsState>,
    Path(workout_id): Path<i64>,
    credentials: Credentials,
) -> Result<Json<DetailedWorkout>> {
    let member = credentials.authorize_header(&state.member_repo).await?;

    let workout = state
        .workout_repo
        .find_owned(workout_id, member.member_id)
        .await?
        .ok_or_else(workout_not_found)?;
    let catalog = state.exercise_repo.find_by_ids(&workout.exercise_ids).await?;

    Ok(Json(DetailedWorkout::assemble(workout, &catalog)))
}

pub async fn add_log(
    State(state): State<WorkoutsState>,
    credentials: Credentials,
    JsonBody(form): JsonBody<CreateWorkoutLog>,
) -> Result<Response> {
    let member = credentials
        .authorize_optional(&state.member_repo, form.member_id)
        .await?;

    let (Some(workout_id), Some(time)) = (form.workout_id, form.time.filter(|t| *t >= 0)) else {
        return Err(AppError::Validation("Missing required fields".to_string()));
    };

    state
        .workout_repo
        .find_owned(workout_id, member.member_id)
        .await?
        .ok_or_else(workout_not_found)?;

    let log = state
        .log_repo
        .append(member.member_id, workout_id, time)
        .await?;

    tracing::info!("Logged {}s on workout {}", time, workout_id);
    Ok((StatusCode::CREATED, Json(WorkoutLogCreated { log_id: log.log_id })).into_response())
}

pub async fn list_logs(
    State(state): State<WorkoutsState>,
    Path(member_id): Path<i64>,
    credentials: Credentials,
) -> Result<Json<Vec<WorkoutLog>>> {
    credentials.authorize(&state.member_repo, member_id).await?;

    let logs = state.log_repo.find_by_member(member_id).await?;
    Ok(Json(logs))
}
