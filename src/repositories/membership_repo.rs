use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, GymMembership};

#[derive(Clone)]
pub struct MembershipRepository {
    pool: DbPool,
}

impl MembershipRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert or replace the member's single membership row in one statement,
    /// so concurrent calls cannot both take the insert path.
    pub async fn upsert(&self, membership: GymMembership) -> Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO gym_memberships (member_id, gym, address, membership_type)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT(member_id)
                 DO UPDATE SET gym = excluded.gym,
                               address = excluded.address,
                               membership_type = excluded.membership_type",
                rusqlite::params![
                    membership.member_id,
                    membership.gym,
                    membership.address,
                    membership.membership_type
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_member(&self, member_id: i64) -> Result<Option<GymMembership>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM gym_memberships WHERE member_id = ?")?;
            let result = stmt
                .query_row([member_id], GymMembership::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
