//! HTTP client for the repbook API plus the pieces a front end needs around
//! it: persisted credentials and a single-owner view state.

mod error;
mod keychain;
mod session;
mod state;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::middleware::{AUTH_KEY_HEADER, MEMBER_ID_HEADER};
use crate::models::{
    AttachExercises, AuthResponse, CreateWorkout, CreateWorkoutLog, DetailedWorkout, Exercise,
    LoginRequest, MemberMetrics, RenameWorkout, SafeData, SetGymMembership, SignupRequest,
    UpdateUserInfo, UserInfo, UsernameAvailability, Workout, WorkoutCreated, WorkoutLog,
    WorkoutLogCreated,
};

pub use error::ClientError;
pub use keychain::{
    CredentialStore, CredentialStoreError, FileCredentialStore, MemoryCredentialStore,
};
pub use session::{AuthState, Session, AUTH_KEY_ACCOUNT, MEMBER_ID_ACCOUNT};
pub use state::{spawn_state_loop, StateUpdate, ViewState};

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Service name the credentials are stored under.
    pub keychain_service: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            keychain_service: "repbook".to_string(),
        }
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
        }
    }

    /// Appends percent-encoded path segments to the base address.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    fn signed(&self, method: Method, url: Url, creds: &AuthResponse) -> RequestBuilder {
        self.request(method, url)
            .header(AUTH_KEY_HEADER, &creds.auth_key)
            .header(MEMBER_ID_HEADER, creds.member_id.to_string())
    }

    async fn send(&self, request: RequestBuilder, expected: StatusCode) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status != expected {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Unexpected status {}: {}", status, body);
            return Err(ClientError::UnexpectedStatus { status, body });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        body: &B,
        expected: StatusCode,
    ) -> Result<T> {
        let response = self.send(request.json(body), expected).await?;
        Self::decode(response).await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        let url = self.endpoint(&["signup"])?;
        self.send_json(self.request(Method::POST, url), request, StatusCode::CREATED)
            .await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let url = self.endpoint(&["login"])?;
        self.send_json(self.request(Method::POST, url), request, StatusCode::OK)
            .await
    }

    pub async fn check_username(&self, username: &str) -> Result<bool> {
        let url = self.endpoint(&["checkUsername", username])?;
        let response = self
            .send(self.request(Method::GET, url), StatusCode::OK)
            .await?;
        let availability: UsernameAvailability = Self::decode(response).await?;
        Ok(availability.is_available)
    }

    pub async fn create_workout(
        &self,
        creds: &AuthResponse,
        workout_name: &str,
        exercise_ids: &[i64],
    ) -> Result<()> {
        let url = self.endpoint(&["createWorkout", &creds.member_id.to_string()])?;
        let body = CreateWorkout {
            workout_name: Some(workout_name.to_string()),
            exercise_ids: Some(exercise_ids.to_vec()),
        };
        self.send(
            self.signed(Method::POST, url, creds).json(&body),
            StatusCode::OK,
        )
        .await?;
        Ok(())
    }

    /// Records an unnamed workout. Returns its id.
    pub async fn attach_exercises(
        &self,
        creds: &AuthResponse,
        exercise_ids: &[i64],
    ) -> Result<i64> {
        let url = self.endpoint(&["exercises"])?;
        let body = AttachExercises {
            member_id: Some(creds.member_id),
            exercise_ids: Some(exercise_ids.to_vec()),
        };
        let created: WorkoutCreated = self
            .send_json(
                self.signed(Method::POST, url, creds),
                &body,
                StatusCode::CREATED,
            )
            .await?;
        Ok(created.workout_id)
    }

    pub async fn update_user_info(&self, creds: &AuthResponse, info: &UserInfo) -> Result<()> {
        let url = self.endpoint(&["updateUserInfo", &creds.member_id.to_string()])?;
        let body = UpdateUserInfo {
            first_name: Some(info.first_name.clone()),
            last_name: Some(info.last_name.clone()),
            date_of_birth: Some(info.date_of_birth.clone()),
            email: Some(info.email.clone()),
            username: Some(info.username.clone()),
        };
        self.send(
            self.signed(Method::POST, url, creds).json(&body),
            StatusCode::OK,
        )
        .await?;
        Ok(())
    }

    pub async fn fetch_user_info(&self, creds: &AuthResponse) -> Result<UserInfo> {
        let url = self.endpoint(&["userDataAndMetrics", &creds.member_id.to_string()])?;
        let response = self
            .send(self.signed(Method::GET, url, creds), StatusCode::OK)
            .await?;
        Self::decode(response).await
    }

    pub async fn set_gym_membership(
        &self,
        creds: &AuthResponse,
        gym: &str,
        address: &str,
        membership_type: &str,
    ) -> Result<()> {
        let url = self.endpoint(&["setGymMembership"])?;
        let body = SetGymMembership {
            member_id: Some(creds.member_id),
            gym: Some(gym.to_string()),
            address: Some(address.to_string()),
            membership_type: Some(membership_type.to_string()),
        };
        self.send(
            self.signed(Method::POST, url, creds).json(&body),
            StatusCode::OK,
        )
        .await?;
        Ok(())
    }

    pub async fn fetch_workouts(&self, creds: &AuthResponse) -> Result<Vec<Workout>> {
        let url = self.endpoint(&["workouts", &creds.member_id.to_string()])?;
        let response = self
            .send(self.signed(Method::GET, url, creds), StatusCode::OK)
            .await?;
        Self::decode(response).await
    }

    pub async fn fetch_member_metrics(&self, creds: &AuthResponse) -> Result<Vec<MemberMetrics>> {
        let url = self.endpoint(&["membersMetrics", &creds.member_id.to_string()])?;
        let response = self
            .send(self.signed(Method::GET, url, creds), StatusCode::OK)
            .await?;
        Self::decode(response).await
    }

    /// One catalog page, 1-based.
    pub async fn fetch_exercises(&self, page: u32) -> Result<Vec<Exercise>> {
        let mut url = self.endpoint(&["exercises"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string());
        let response = self
            .send(self.request(Method::GET, url), StatusCode::OK)
            .await?;
        Self::decode(response).await
    }

    pub async fn workout_exercises(&self, workout_id: i64) -> Result<Vec<Exercise>> {
        let mut url = self.endpoint(&["exercises", "search"])?;
        url.query_pairs_mut()
            .append_pair("workoutId", &workout_id.to_string());
        let response = self
            .send(self.request(Method::GET, url), StatusCode::OK)
            .await?;
        Self::decode(response).await
    }

    pub async fn search_exercises(&self, query: &str) -> Result<Vec<Exercise>> {
        let mut url = self.endpoint(&["exercises", "search"])?;
        url.query_pairs_mut().append_pair("q", query);
        let response = self
            .send(self.request(Method::GET, url), StatusCode::OK)
            .await?;
        Self::decode(response).await
    }

    pub async fn rename_workout(
        &self,
        creds: &AuthResponse,
        workout_id: i64,
        new_name: &str,
    ) -> Result<()> {
        let url = self.endpoint(&["workouts", &workout_id.to_string()])?;
        let body = RenameWorkout {
            new_name: Some(new_name.to_string()),
        };
        self.send(
            self.signed(Method::PUT, url, creds).json(&body),
            StatusCode::OK,
        )
        .await?;
        Ok(())
    }

    pub async fn delete_workout(&self, creds: &AuthResponse, workout_id: i64) -> Result<()> {
        let url = self.endpoint(&["workouts", &workout_id.to_string()])?;
        self.send(self.signed(Method::DELETE, url, creds), StatusCode::OK)
            .await?;
        Ok(())
    }

    pub async fn fetch_detailed_workout(
        &self,
        creds: &AuthResponse,
        workout_id: i64,
    ) -> Result<DetailedWorkout> {
        let url = self.endpoint(&["detailedWorkout", &workout_id.to_string()])?;
        let response = self
            .send(self.signed(Method::GET, url, creds), StatusCode::OK)
            .await?;
        Self::decode(response).await
    }

    /// Records a finished session of `time` seconds. Returns the log id.
    pub async fn log_workout(
        &self,
        creds: &AuthResponse,
        workout_id: i64,
        time: i64,
    ) -> Result<i64> {
        let url = self.endpoint(&["workoutLogs"])?;
        let body = CreateWorkoutLog {
            member_id: Some(creds.member_id),
            workout_id: Some(workout_id),
            time: Some(time),
        };
        let created: WorkoutLogCreated = self
            .send_json(
                self.signed(Method::POST, url, creds),
                &body,
                StatusCode::CREATED,
            )
            .await?;
        Ok(created.log_id)
    }

    pub async fn fetch_workout_logs(&self, creds: &AuthResponse) -> Result<Vec<WorkoutLog>> {
        let url = self.endpoint(&["workoutLogs", &creds.member_id.to_string()])?;
        let response = self
            .send(self.signed(Method::GET, url, creds), StatusCode::OK)
            .await?;
        Self::decode(response).await
    }

    pub async fn fetch_safe_data(&self, creds: &AuthResponse) -> Result<SafeData> {
        let url = self.endpoint(&["fetchSafeData", &creds.member_id.to_string()])?;
        let response = self
            .send(self.signed(Method::GET, url, creds), StatusCode::OK)
            .await?;
        Self::decode(response).await
    }
}
