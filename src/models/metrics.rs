use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::numeric::{
    f64_from_number_or_string, i64_from_number_or_string, lenient_f64, lenient_i64,
};
use super::FromSqliteRow;

/// One `members_metrics` row.
///
/// Decoding is tolerant: `weight_kg` and the integer columns accept numeric
/// strings, and the optional extended fields fall back to `None` when they
/// cannot be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberMetrics {
    #[serde(default)]
    pub metric_id: i64,
    #[serde(deserialize_with = "i64_from_number_or_string")]
    pub member_id: i64,
    #[serde(deserialize_with = "i64_from_number_or_string")]
    pub height_cm: i64,
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub weight_kg: f64,
    pub gender: String,
    #[serde(deserialize_with = "i64_from_number_or_string")]
    pub workout_frequency: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub body_fat_percentage: Option<f64>,
    #[serde(default)]
    pub goal_type: Option<String>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub resting_heart_rate: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bmr_calories: Option<f64>,
}

impl FromSqliteRow for MemberMetrics {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            metric_id: row.get("metric_id")?,
            member_id: row.get("member_id")?,
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            gender: row.get("gender")?,
            workout_frequency: row.get("workout_frequency")?,
            body_fat_percentage: row.get("body_fat_percentage")?,
            goal_type: row.get("goal_type")?,
            activity_level: row.get("activity_level")?,
            resting_heart_rate: row.get("resting_heart_rate")?,
            bmr_calories: row.get("bmr_calories")?,
        })
    }
}
