mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use repbook::models::{DetailedWorkout, Workout, WorkoutLog};

async fn create_workout(
    app: &axum::Router,
    creds: &repbook::models::AuthResponse,
    name: &str,
    ids: &[i64],
) -> StatusCode {
    let body = json!({"workoutName": name, "exerciseIds": ids});
    let uri = format!("/createWorkout/{}", creds.member_id);
    common::send(app, common::authed("POST", &uri, creds, Some(&body)))
        .await
        .status()
}

async fn list_workouts(
    app: &axum::Router,
    creds: &repbook::models::AuthResponse,
) -> Vec<Workout> {
    let uri = format!("/workouts/{}", creds.member_id);
    let response = common::send(app, common::authed("GET", &uri, creds, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    common::read_json(response).await
}

#[tokio::test]
async fn test_create_workout_appears_in_owner_list() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);
    let creds = common::signup(&app, "ab1", "a@b.com").await;

    let uri = format!("/createWorkout/{}", creds.member_id);
    let body = json!({"workoutName": "Push Day", "exerciseIds": [3, 1, 2]});
    let response = common::send(&app, common::authed("POST", &uri, &creds, Some(&body))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        common::read_text(response).await,
        "Workout created successfully"
    );

    let workouts = list_workouts(&app, &creds).await;
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0].workout_name, "Push Day");
    assert_eq!(workouts[0].exercise_ids, vec![3, 1, 2]);
    assert_eq!(workouts[0].member_id, creds.member_id);
}

#[tokio::test]
async fn test_workout_list_json_shape() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);
    let creds = common::signup(&app, "ab1", "a@b.com").await;
    create_workout(&app, &creds, "Legs", &[4]).await;

    let uri = format!("/workouts/{}", creds.member_id);
    let response = common::send(&app, common::authed("GET", &uri, &creds, None)).await;
    let body: Value = common::read_json(response).await;
    let row = &body[0];
    assert!(row["workout_id"].is_i64());
    assert_eq!(row["workout_name"], "Legs");
    assert_eq!(row["exercise_ids"], json!([4]));
}

#[tokio::test]
async fn test_create_workout_rejects_empty_ids_or_name() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);
    let creds = common::signup(&app, "ab1", "a@b.com").await;

    assert_eq!(
        create_workout(&app, &creds, "Push", &[]).await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        create_workout(&app, &creds, "  ", &[1]).await,
        StatusCode::BAD_REQUEST
    );
    assert!(list_workouts(&app, &creds).await.is_empty());
}

#[tokio::test]
async fn test_create_workout_non_array_ids_is_missing_fields() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);
    let creds = common::signup(&app, "ab1", "a@b.com").await;

    let uri = format!("/createWorkout/{}", creds.member_id);
    let body = json!({"workoutName": "Push", "exerciseIds": "1"});
    let response = common::send(&app, common::authed("POST", &uri, &creds, Some(&body))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::read_text(response).await, "Missing required fields");
    assert!(list_workouts(&app, &creds).await.is_empty());
}

#[tokio::test]
async fn test_create_workout_with_wrong_key_touches_nothing() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);
    let creds = common::signup(&app, "ab1", "a@b.com").await;

    let uri = format!("/createWorkout/{}", creds.member_id);
    let body = json!({"workoutName": "Push", "exerciseIds": [1]});
    let response = common::send(
        &app,
        common::authed_with_key("POST", &uri, creds.member_id, "bogus", Some(&body)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        common::read_text(response).await,
        "Unauthorized: Invalid authKey"
    );

    assert!(list_workouts(&app, &creds).await.is_empty());
}

#[tokio::test]
async fn test_unknown_member_is_unauthorized() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = common::send(
        &app,
        common::authed_with_key("GET", "/workouts/999", 999, "whatever", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        common::read_text(response).await,
        "Unauthorized: memberId not found"
    );
}

#[tokio::test]
async fn test_rename_workout() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);
    let creds = common::signup(&app, "ab1", "a@b.com").await;
    create_workout(&app, &creds, "Push", &[1]).await;
    let workout_id = list_workouts(&app, &creds).await[0].workout_id;

    let uri = format!("/workouts/{}", workout_id);
    let response = common::send(
        &app,
        common::authed("PUT", &uri, &creds, Some(&json!({"newName": "Chest"}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(list_workouts(&app, &creds).await[0].workout_name, "Chest");

    let blank = common::send(
        &app,
        common::authed("PUT", &uri, &creds, Some(&json!({"newName": ""}))),
    )
    .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let missing = common::send(
        &app,
        common::authed("PUT", "/workouts/999", &creds, Some(&json!({"newName": "X"}))),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_workout() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);
    let creds = common::signup(&app, "ab1", "a@b.com").await;
    create_workout(&app, &creds, "Push", &[1]).await;
    let workout_id = list_workouts(&app, &creds).await[0].workout_id;

    let uri = format!("/workouts/{}", workout_id);
    let response = common::send(&app, common::authed("DELETE", &uri, &creds, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(list_workouts(&app, &creds).await.is_empty());

    let again = common::send(&app, common::authed("DELETE", &uri, &creds, None)).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::read_text(again).await, "Workout not found");
}

#[tokio::test]
async fn test_cannot_touch_another_members_workout() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);
    let owner = common::signup(&app, "owner", "owner@b.com").await;
    let intruder = common::signup(&app, "intruder", "intruder@b.com").await;
    create_workout(&app, &owner, "Push", &[1]).await;
    let workout_id = list_workouts(&app, &owner).await[0].workout_id;
    let uri = format!("/workouts/{}", workout_id);

    // Valid key of another member reads as not found
    let response = common::send(&app, common::authed("DELETE", &uri, &intruder, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Claiming to be the owner without the owner's key
    let response = common::send(
        &app,
        common::authed_with_key("DELETE", &uri, owner.member_id, &intruder.auth_key, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Listing someone else's workouts with your own key
    let list_uri = format!("/workouts/{}", owner.member_id);
    let response = common::send(&app, common::authed("GET", &list_uri, &intruder, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(list_workouts(&app, &owner).await.len(), 1);
}

#[tokio::test]
async fn test_detailed_workout_resolves_exercises_in_order() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let creds = common::signup(&app, "ab1", "a@b.com").await;
    let squat = common::insert_exercise(&pool, "Squat").await;
    let lunge = common::insert_exercise(&pool, "Lunge").await;
    create_workout(&app, &creds, "Legs", &[lunge, 9999, squat]).await;
    let workout_id = list_workouts(&app, &creds).await[0].workout_id;

    let uri = format!("/detailedWorkout/{}", workout_id);
    let response = common::send(&app, common::authed("GET", &uri, &creds, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let detailed: DetailedWorkout = common::read_json(response).await;
    assert_eq!(detailed.workout_name, "Legs");
    let titles: Vec<_> = detailed.exercises.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Lunge", "Squat"]);

    let missing = common::send(
        &app,
        common::authed("GET", "/detailedWorkout/424242", &creds, None),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_workout_logs_newest_first() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);
    let creds = common::signup(&app, "ab1", "a@b.com").await;
    create_workout(&app, &creds, "Push", &[1]).await;
    let workout_id = list_workouts(&app, &creds).await[0].workout_id;

    for time in [600, 900] {
        let body = json!({"memberId": creds.member_id, "workoutId": workout_id, "time": time});
        let response =
            common::send(&app, common::authed("POST", "/workoutLogs", &creds, Some(&body))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Value = common::read_json(response).await;
        assert!(created["logId"].is_i64());
    }

    let uri = format!("/workoutLogs/{}", creds.member_id);
    let response = common::send(&app, common::authed("GET", &uri, &creds, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let logs: Vec<WorkoutLog> = common::read_json(response).await;
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].time, 900);
    assert_eq!(logs[1].time, 600);
}

#[tokio::test]
async fn test_workout_log_rejects_foreign_workout_and_negative_time() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);
    let owner = common::signup(&app, "owner", "owner@b.com").await;
    let other = common::signup(&app, "other", "other@b.com").await;
    create_workout(&app, &owner, "Push", &[1]).await;
    let workout_id = list_workouts(&app, &owner).await[0].workout_id;

    let foreign = json!({"memberId": other.member_id, "workoutId": workout_id, "time": 60});
    let response =
        common::send(&app, common::authed("POST", "/workoutLogs", &other, Some(&foreign))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let negative = json!({"memberId": owner.member_id, "workoutId": workout_id, "time": -5});
    let response =
        common::send(&app, common::authed("POST", "/workoutLogs", &owner, Some(&negative))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
