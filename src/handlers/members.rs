use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{AppError, Result};
use crate::extract::JsonBody;
use crate::middleware::Credentials;
use crate::models::member::present;
use crate::models::{
    DetailedWorkout, GymMembership, MemberMetrics, SafeData, SetGymMembership, UpdateUserInfo,
    UserInfo, WorkoutSummary,
};
use crate::repositories::{
    ExerciseRepository, MemberRepository, MembershipRepository, WorkoutRepository,
};

#[derive(Clone)]
pub struct MembersState {
    pub member_repo: MemberRepository,
    pub membership_repo: MembershipRepository,
    pub workout_repo: WorkoutRepository,
    pub exercise_repo: ExerciseRepository,
}

pub async fn update_user_info(
    State(state): State<MembersState>,
    Path(member_id): Path<i64>,
    credentials: Credentials,
    JsonBody(form): JsonBody<UpdateUserInfo>,
) -> Result<&'static str> {
    credentials.authorize(&state.member_repo, member_id).await?;

    let info = form
        .validated()
        .ok_or_else(|| AppError::Validation("Missing required fields".to_string()))?;

    let updated = state
        .member_repo
        .update_user_info(member_id, info)
        .await
        .map_err(|e| {
            if e.is_constraint_violation() {
                AppError::Conflict("Username or email already in use".to_string())
            } else {
                e
            }
        })?;

    if !updated {
        return Err(AppError::NotFound("Member not found".to_string()));
    }

    tracing::info!("Updated user information for member {}", member_id);
    Ok("User information updated successfully")
}

pub async fn user_data_and_metrics(
    State(state): State<MembersState>,
    Path(member_id): Path<i64>,
    credentials: Credentials,
) -> Result<Json<UserInfo>> {
    credentials.authorize(&state.member_repo, member_id).await?;

    let info = state
        .member_repo
        .find_user_info(member_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

    Ok(Json(info))
}

pub async fn members_metrics(
    State(state): State<MembersState>,
    Path(member_id): Path<i64>,
    credentials: Credentials,
) -> Result<Json<Vec<MemberMetrics>>> {
    credentials.authorize(&state.member_repo, member_id).await?;

    let metrics = state.member_repo.find_metrics(member_id).await?;
    tracing::debug!("Fetched {} metrics rows for member {}", metrics.len(), member_id);
    Ok(Json(metrics))
}

pub async fn set_gym_membership(
    State(state): State<MembersState>,
    credentials: Credentials,
    JsonBody(form): JsonBody<SetGymMembership>,
) -> Result<&'static str> {
    let member = credentials
        .authorize_optional(&state.member_repo, form.member_id)
        .await?;

    let (Some(gym), Some(address), Some(membership_type)) = (
        present(&form.gym),
        present(&form.address),
        present(&form.membership_type),
    ) else {
        return Err(AppError::Validation("Missing required fields".to_string()));
    };

    state
        .membership_repo
        .upsert(GymMembership {
            member_id: member.member_id,
            gym,
            address,
            membership_type,
        })
        .await?;

    tracing::info!("Set gym membership for member {}", member.member_id);
    Ok("Gym membership information updated successfully")
}

pub async fn safe_data(
    State(state): State<MembersState>,
    Path(member_id): Path<i64>,
    credentials: Credentials,
) -> Result<Json<SafeData>> {
    credentials.authorize(&state.member_repo, member_id).await?;

    let info = state
        .member_repo
        .find_user_info(member_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

    let workouts = state.workout_repo.find_by_member(member_id).await?;
    let mut all_ids: Vec<i64> = workouts
        .iter()
        .flat_map(|w| w.exercise_ids.iter().copied())
        .collect();
    all_ids.sort_unstable();
    all_ids.dedup();
    let catalog = state.exercise_repo.find_by_ids(&all_ids).await?;

    let workouts = workouts
        .into_iter()
        .map(|workout| {
            let detailed = DetailedWorkout::assemble(workout, &catalog);
            WorkoutSummary {
                workout_name: detailed.workout_name,
                exercise_titles: detailed.exercises.into_iter().map(|e| e.title).collect(),
            }
        })
        .collect();

    Ok(Json(SafeData {
        first_name: info.first_name,
        date_of_birth: info.date_of_birth,
        workouts,
    }))
}
