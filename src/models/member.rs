use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::numeric::{lenient_f64, lenient_i64};
use super::FromSqliteRow;

#[derive(Debug, Clone)]
pub struct Member {
    pub member_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub email: String,
    pub password_hash: String,
    pub username: String,
    pub auth_key: String,
    pub time_created: DateTime<Utc>,
}

impl FromSqliteRow for Member {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            member_id: row.get("member_id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            date_of_birth: row.get("date_of_birth")?,
            email: row.get("email")?,
            password_hash: row.get("password_hash")?,
            username: row.get("username")?,
            auth_key: row.get("auth_key")?,
            time_created: row.get("time_created")?,
        })
    }
}

/// Signup payload. Every field is optional at the serde level so missing
/// fields are reported as a 400 with a message instead of a decode failure.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub height_cm: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight_kg: Option<f64>,
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub workout_frequency: Option<i64>,
}

/// Validated account half of a signup.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub email: String,
    pub password: String,
    pub username: String,
}

/// Validated metrics half of a signup.
#[derive(Debug, Clone)]
pub struct NewMetrics {
    pub height_cm: i64,
    pub weight_kg: f64,
    pub gender: String,
    pub workout_frequency: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub password: String,
}

/// Returned by both signup and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub member_id: i64,
    pub auth_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameAvailability {
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub email: String,
    pub username: String,
}

impl FromSqliteRow for UserInfo {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            date_of_birth: row.get("date_of_birth")?,
            email: row.get("email")?,
            username: row.get("username")?,
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
}

/// Public-facing profile summary: first name, birth date and the titles of
/// every exercise in each of the member's workouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeData {
    pub first_name: String,
    pub date_of_birth: String,
    pub workouts: Vec<WorkoutSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub workout_name: String,
    pub exercise_titles: Vec<String>,
}

/// A string field counts as present when it is non-blank.
pub(crate) fn present(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

impl SignupRequest {
    pub fn account(&self) -> Option<NewMember> {
        Some(NewMember {
            first_name: present(&self.first_name)?,
            last_name: present(&self.last_name)?,
            date_of_birth: present(&self.date_of_birth)?,
            email: present(&self.email)?,
            password: self.password.clone().filter(|p| !p.is_empty())?,
            username: present(&self.username)?,
        })
    }

    /// Zero counts as missing for the numeric fields.
    pub fn metrics(&self) -> Option<NewMetrics> {
        Some(NewMetrics {
            height_cm: self.height_cm.filter(|v| *v != 0)?,
            weight_kg: self.weight_kg.filter(|v| *v != 0.0)?,
            gender: present(&self.gender)?,
            workout_frequency: self.workout_frequency.filter(|v| *v != 0)?,
        })
    }
}

impl UpdateUserInfo {
    pub fn validated(&self) -> Option<UserInfo> {
        Some(UserInfo {
            first_name: present(&self.first_name)?,
            last_name: present(&self.last_name)?,
            date_of_birth: present(&self.date_of_birth)?,
            email: present(&self.email)?,
            username: present(&self.username)?,
        })
    }
}
