use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GymMembership {
    pub member_id: i64,
    pub gym: String,
    pub address: String,
    pub membership_type: String,
}

impl FromSqliteRow for GymMembership {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            member_id: row.get("member_id")?,
            gym: row.get("gym")?,
            address: row.get("address")?,
            membership_type: row.get("membership_type")?,
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetGymMembership {
    pub member_id: Option<i64>,
    pub gym: Option<String>,
    pub address: Option<String>,
    pub membership_type: Option<String>,
}
