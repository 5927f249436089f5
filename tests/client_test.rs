mod common;

use reqwest::StatusCode;
use tokio::net::TcpListener;

use repbook::client::{
    spawn_state_loop, ApiClient, AuthState, ClientConfig, ClientError, MemoryCredentialStore,
    Session, StateUpdate, ViewState,
};
use repbook::db::DbPool;
use repbook::models::{LoginRequest, SignupRequest, UserInfo};

async fn spawn_server() -> (String, DbPool) {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), pool)
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(&ClientConfig {
        base_url: base_url.to_string(),
        ..ClientConfig::default()
    })
}

fn signup_request(username: &str, email: &str) -> SignupRequest {
    serde_json::from_value(common::signup_body(username, email)).unwrap()
}

#[tokio::test]
async fn test_client_signup_login_and_session() {
    let (base_url, _pool) = spawn_server().await;
    let api = client(&base_url);

    assert!(api.check_username("ab1").await.unwrap());
    let created = api.signup(&signup_request("ab1", "a@b.com")).await.unwrap();
    assert!(!api.check_username("ab1").await.unwrap());

    let logged_in = api
        .login(&LoginRequest {
            email: Some("a@b.com".to_string()),
            username: None,
            password: "secret123".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(logged_in, created);

    let session = Session::new(MemoryCredentialStore::new(), "repbook");
    session.sign_in(&logged_in).unwrap();
    assert_eq!(
        session.restore().unwrap(),
        AuthState::Authenticated(created.clone())
    );

    let info = api.fetch_user_info(&session.credentials().unwrap()).await.unwrap();
    assert_eq!(info.username, "ab1");
}

#[tokio::test]
async fn test_client_workout_lifecycle() {
    let (base_url, pool) = spawn_server().await;
    let api = client(&base_url);
    let creds = api.signup(&signup_request("ab1", "a@b.com")).await.unwrap();
    let squat = common::insert_exercise(&pool, "Squat").await;

    api.create_workout(&creds, "Legs", &[squat]).await.unwrap();
    let workouts = api.fetch_workouts(&creds).await.unwrap();
    assert_eq!(workouts.len(), 1);
    let workout_id = workouts[0].workout_id;

    api.rename_workout(&creds, workout_id, "Leg Day").await.unwrap();
    let detailed = api.fetch_detailed_workout(&creds, workout_id).await.unwrap();
    assert_eq!(detailed.workout_name, "Leg Day");
    assert_eq!(detailed.exercises[0].title, "Squat");

    let found = api.workout_exercises(workout_id).await.unwrap();
    assert_eq!(found.len(), 1);

    let log_id = api.log_workout(&creds, workout_id, 1800).await.unwrap();
    let logs = api.fetch_workout_logs(&creds).await.unwrap();
    assert_eq!(logs[0].log_id, log_id);
    assert_eq!(logs[0].time, 1800);

    let safe = api.fetch_safe_data(&creds).await.unwrap();
    assert_eq!(safe.workouts[0].exercise_titles, vec!["Squat".to_string()]);

    api.delete_workout(&creds, workout_id).await.unwrap();
    assert!(api.fetch_workouts(&creds).await.unwrap().is_empty());

    let err = api.delete_workout(&creds, workout_id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_client_profile_and_catalog() {
    let (base_url, pool) = spawn_server().await;
    let api = client(&base_url);
    let creds = api.signup(&signup_request("ab1", "a@b.com")).await.unwrap();
    common::seed_exercises(&pool, 60).await;

    let page = api.fetch_exercises(2).await.unwrap();
    assert_eq!(page.len(), 10);
    let found = api.search_exercises("exercise 6").await.unwrap();
    assert!(found.iter().any(|e| e.title == "Exercise 60"));

    let workout_id = api.attach_exercises(&creds, &[1, 2]).await.unwrap();
    assert!(workout_id > 0);

    api.set_gym_membership(&creds, "Iron Temple", "1 Main St", "Annual")
        .await
        .unwrap();

    let updated = UserInfo {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        date_of_birth: "1906-12-09".to_string(),
        email: "grace@navy.mil".to_string(),
        username: "grace".to_string(),
    };
    api.update_user_info(&creds, &updated).await.unwrap();
    assert_eq!(api.fetch_user_info(&creds).await.unwrap(), updated);

    let metrics = api.fetch_member_metrics(&creds).await.unwrap();
    assert_eq!(metrics[0].weight_kg, 60.5);
}

#[tokio::test]
async fn test_client_surfaces_unauthorized_status() {
    let (base_url, _pool) = spawn_server().await;
    let api = client(&base_url);
    let mut creds = api.signup(&signup_request("ab1", "a@b.com")).await.unwrap();
    creds.auth_key = "stale".to_string();

    let err = api.fetch_workouts(&creds).await.unwrap_err();
    assert!(err.is_unauthorized());
    match err {
        ClientError::UnexpectedStatus { body, .. } => {
            assert_eq!(body, "Unauthorized: Invalid authKey");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_client_reports_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{}", addr));
    let err = api.check_username("anyone").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn test_client_truncated_body_is_decode_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;
        // Promise more bytes than are sent, then hang up
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 64\r\n\r\n{\"isAvail")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let api = client(&format!("http://{}", addr));
    let err = api.check_username("anyone").await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_results_feed_the_state_loop() {
    let (base_url, _pool) = spawn_server().await;
    let api = client(&base_url);
    let creds = api.signup(&signup_request("ab1", "a@b.com")).await.unwrap();
    api.create_workout(&creds, "Push", &[1]).await.unwrap();

    let (tx, snapshots, handle) = spawn_state_loop(ViewState::default());
    tx.send(StateUpdate::SignedIn(creds.clone())).await.unwrap();
    match api.fetch_workouts(&creds).await {
        Ok(workouts) => tx.send(StateUpdate::Workouts(workouts)).await.unwrap(),
        Err(e) => tx.send(StateUpdate::Failed(e.to_string())).await.unwrap(),
    }
    drop(tx);
    handle.await.unwrap();

    let state = snapshots.borrow().clone();
    assert_eq!(state.auth, AuthState::Authenticated(creds));
    assert_eq!(state.workouts.len(), 1);
    assert_eq!(state.last_error, None);
}
