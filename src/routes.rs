use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{auth, exercises, health, members, workouts};

pub fn create_router(
    auth_state: auth::AuthState,
    members_state: members::MembersState,
    workouts_state: workouts::WorkoutsState,
    exercises_state: exercises::ExercisesState,
) -> Router {
    Router::new()
        // Account routes
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/checkUsername/{username}", get(auth::check_username))
        .with_state(auth_state)
        // Member profile routes
        .route("/updateUserInfo/{memberId}", post(members::update_user_info))
        .route(
            "/userDataAndMetrics/{memberId}",
            get(members::user_data_and_metrics),
        )
        .route("/membersMetrics/{memberId}", get(members::members_metrics))
        .route("/setGymMembership", post(members::set_gym_membership))
        .route("/fetchSafeData/{memberId}", get(members::safe_data))
        .with_state(members_state)
        // Workout routes. GET takes a member id, PUT/DELETE a workout id.
        .route(
            "/workouts/{id}",
            get(workouts::list)
                .put(workouts::rename)
                .delete(workouts::delete),
        )
        .route("/createWorkout/{memberId}", post(workouts::create))
        .route("/detailedWorkout/{workoutId}", get(workouts::detailed))
        .route("/workoutLogs", post(workouts::add_log))
        .route("/workoutLogs/{memberId}", get(workouts::list_logs))
        .with_state(workouts_state)
        // Exercise catalog routes
        .route(
            "/exercises",
            get(exercises::list).post(exercises::attach_exercises),
        )
        .route("/exercises/search", get(exercises::search))
        .route("/health", get(health::health_check))
        .with_state(exercises_state)
        .layer(CorsLayer::new().allow_origin(Any))
        .layer(TraceLayer::new_for_http())
}
