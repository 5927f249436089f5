#![allow(dead_code)]

use axum::{body::Body, Router};
use http::{header, Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use repbook::db::{create_memory_pool, DbPool};
use repbook::handlers::{auth, exercises, members, workouts};
use repbook::migrations::run_migrations_for_tests;
use repbook::models::{AuthResponse, NewExercise};
use repbook::repositories::{
    ExerciseRepository, MemberRepository, MembershipRepository, WorkoutLogRepository,
    WorkoutRepository,
};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    let member_repo = MemberRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let membership_repo = MembershipRepository::new(pool.clone());
    let log_repo = WorkoutLogRepository::new(pool.clone());

    let auth_state = auth::AuthState {
        member_repo: member_repo.clone(),
    };
    let members_state = members::MembersState {
        member_repo: member_repo.clone(),
        membership_repo,
        workout_repo: workout_repo.clone(),
        exercise_repo: exercise_repo.clone(),
    };
    let workouts_state = workouts::WorkoutsState {
        member_repo: member_repo.clone(),
        workout_repo: workout_repo.clone(),
        exercise_repo: exercise_repo.clone(),
        log_repo,
    };
    let exercises_state = exercises::ExercisesState {
        member_repo,
        exercise_repo,
        workout_repo,
    };

    repbook::routes::create_router(auth_state, members_state, workouts_state, exercises_state)
}

pub fn signup_body(username: &str, email: &str) -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "dateOfBirth": "1990-12-10",
        "email": email,
        "password": "secret123",
        "username": username,
        "heightCm": 170,
        "weightKg": 60.5,
        "gender": "F",
        "workoutFrequency": 3
    })
}

/// Signs a member up through the API and returns the issued credential.
pub async fn signup(app: &Router, username: &str, email: &str) -> AuthResponse {
    let response = send(app, json_request("POST", "/signup", &signup_body(username, email))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await
}

/// Inserts `count` catalog rows titled `Exercise 1..=count`.
pub async fn seed_exercises(pool: &DbPool, count: usize) -> Vec<repbook::models::Exercise> {
    let repo = ExerciseRepository::new(pool.clone());
    let rows = (1..=count)
        .map(|i| NewExercise {
            title: format!("Exercise {}", i),
            equipment: "Dumbbell".to_string(),
            difficulty: "Beginner".to_string(),
        })
        .collect();
    repo.insert_many(rows).await.unwrap();
    repo.find_page(count as i64, 0).await.unwrap()
}

pub async fn insert_exercise(pool: &DbPool, title: &str) -> i64 {
    let repo = ExerciseRepository::new(pool.clone());
    repo.insert_many(vec![NewExercise {
        title: title.to_string(),
        equipment: "Barbell".to_string(),
        difficulty: "Intermediate".to_string(),
    }])
    .await
    .unwrap();
    repo.search_by_title(title).await.unwrap()[0].id
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Request carrying the member's credential headers.
pub fn authed(
    method: &str,
    uri: &str,
    creds: &AuthResponse,
    body: Option<&Value>,
) -> Request<Body> {
    authed_with_key(method, uri, creds.member_id, &creds.auth_key, body)
}

pub fn authed_with_key(
    method: &str,
    uri: &str,
    member_id: i64,
    auth_key: &str,
    body: Option<&Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Auth-Key", auth_key)
        .header("Member-Id", member_id.to_string());

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn read_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn read_json<T: serde::de::DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
