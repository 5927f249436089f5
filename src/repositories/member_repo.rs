use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rand_core::{OsRng, RngCore};
use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    AuthResponse, FromSqliteRow, Member, MemberMetrics, NewMember, NewMetrics, UserInfo,
};

/// Raw bytes behind an auth key; rendered as 40 hex characters.
const AUTH_KEY_BYTES: usize = 20;

#[derive(Clone)]
pub struct MemberRepository {
    pool: DbPool,
}

impl MemberRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert the account and its first metrics row in one transaction and
    /// issue the member's auth key.
    pub async fn create_with_metrics(
        &self,
        member: NewMember,
        metrics: NewMetrics,
    ) -> Result<AuthResponse> {
        let password_hash = hash_password(&member.password)?;
        let auth_key = generate_auth_key();
        let now = Utc::now();

        let pool = self.pool.clone();
        let key = auth_key.clone();
        let member_id = tokio::task::spawn_blocking(move || -> Result<i64> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO members (first_name, last_name, date_of_birth, email, password_hash, username, auth_key, time_created)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    member.first_name,
                    member.last_name,
                    member.date_of_birth,
                    member.email,
                    password_hash,
                    member.username,
                    key,
                    now
                ],
            )?;
            let member_id = tx.last_insert_rowid();
            tx.execute(
                "INSERT INTO members_metrics (member_id, height_cm, weight_kg, gender, workout_frequency)
                 VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![
                    member_id,
                    metrics.height_cm,
                    metrics.weight_kg,
                    metrics.gender,
                    metrics.workout_frequency
                ],
            )?;
            tx.commit()?;
            Ok(member_id)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(AuthResponse {
            member_id,
            auth_key,
        })
    }

    pub async fn find_by_id(&self, member_id: i64) -> Result<Option<Member>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM members WHERE member_id = ?")?;
            let result = stmt.query_row([member_id], Member::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Member>> {
        let pool = self.pool.clone();
        let email = email.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM members WHERE email = ?")?;
            let result = stmt.query_row([&email], Member::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Member>> {
        let pool = self.pool.clone();
        let username = username.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM members WHERE username = ?")?;
            let result = stmt.query_row([&username], Member::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Stored auth key for the member, `None` if no such member exists.
    pub async fn auth_key(&self, member_id: i64) -> Result<Option<String>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let key = conn
                .query_row(
                    "SELECT auth_key FROM members WHERE member_id = ?",
                    [member_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(key)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Exact, case-sensitive match against stored usernames.
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let username = username.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM members WHERE username = ?",
                [&username],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Looks the account up by email when given, else by username, and checks
    /// the password. `None` covers both unknown account and wrong password.
    pub async fn verify_login(
        &self,
        email: Option<&str>,
        username: Option<&str>,
        password: &str,
    ) -> Result<Option<Member>> {
        let member = match (email, username) {
            (Some(email), _) => self.find_by_email(email).await?,
            (None, Some(username)) => self.find_by_username(username).await?,
            (None, None) => None,
        };

        match member {
            Some(member) if verify_password(password, &member.password_hash)? => Ok(Some(member)),
            _ => Ok(None),
        }
    }

    pub async fn find_user_info(&self, member_id: i64) -> Result<Option<UserInfo>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT first_name, last_name, date_of_birth, email, username
                 FROM members WHERE member_id = ?",
            )?;
            let result = stmt.query_row([member_id], UserInfo::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn update_user_info(&self, member_id: i64, info: UserInfo) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE members
                 SET first_name = ?, last_name = ?, date_of_birth = ?, email = ?, username = ?
                 WHERE member_id = ?",
                rusqlite::params![
                    info.first_name,
                    info.last_name,
                    info.date_of_birth,
                    info.email,
                    info.username,
                    member_id
                ],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_metrics(&self, member_id: i64) -> Result<Vec<MemberMetrics>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn
                .prepare("SELECT * FROM members_metrics WHERE member_id = ? ORDER BY metric_id")?;
            let metrics = stmt
                .query_map([member_id], MemberMetrics::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(metrics)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::PasswordHash)?
        .to_string();
    Ok(password_hash)
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::PasswordHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn generate_auth_key() -> String {
    let mut bytes = [0u8; AUTH_KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
