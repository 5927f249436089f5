use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::extract::JsonBody;
use crate::models::{AuthResponse, LoginRequest, SignupRequest, UsernameAvailability};
use crate::repositories::MemberRepository;

#[derive(Clone)]
pub struct AuthState {
    pub member_repo: MemberRepository,
}

pub async fn signup(
    State(state): State<AuthState>,
    JsonBody(form): JsonBody<SignupRequest>,
) -> Result<Response> {
    let account = form
        .account()
        .ok_or_else(|| AppError::Validation("Missing required account fields".to_string()))?;
    let metrics = form
        .metrics()
        .ok_or_else(|| AppError::Validation("Missing required metrics fields".to_string()))?;

    let username = account.username.clone();
    let created = state
        .member_repo
        .create_with_metrics(account, metrics)
        .await
        .map_err(|e| {
            if e.is_constraint_violation() {
                AppError::Conflict("Username or email already in use".to_string())
            } else {
                e
            }
        })?;

    tracing::info!("Member {} signed up as {}", created.member_id, username);

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

pub async fn login(
    State(state): State<AuthState>,
    JsonBody(credentials): JsonBody<LoginRequest>,
) -> Result<Response> {
    let email = credentials.email.as_deref().filter(|s| !s.is_empty());
    let username = credentials.username.as_deref().filter(|s| !s.is_empty());

    if email.is_none() && username.is_none() {
        return Err(AppError::BadRequest(
            "Email or username is required".to_string(),
        ));
    }

    let member = state
        .member_repo
        .verify_login(email, username, &credentials.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    tracing::info!("Member {} logged in", member.member_id);

    Ok(Json(AuthResponse {
        member_id: member.member_id,
        auth_key: member.auth_key,
    })
    .into_response())
}

pub async fn check_username(
    State(state): State<AuthState>,
    Path(username): Path<String>,
) -> Result<Json<UsernameAvailability>> {
    let taken = state.member_repo.username_exists(&username).await?;
    Ok(Json(UsernameAvailability {
        is_available: !taken,
    }))
}
