use rusqlite::types::Type;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::numeric::lenient_id_list;
use super::{Exercise, FromSqliteRow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    pub workout_id: i64,
    pub member_id: i64,
    pub workout_name: String,
    pub exercise_ids: Vec<i64>,
}

impl FromSqliteRow for Workout {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let raw_ids: String = row.get("exercise_ids")?;
        let exercise_ids = serde_json::from_str(&raw_ids).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
        })?;

        Ok(Self {
            workout_id: row.get("workout_id")?,
            member_id: row.get("member_id")?,
            workout_name: row.get("workout_name")?,
            exercise_ids,
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkout {
    pub workout_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_id_list")]
    pub exercise_ids: Option<Vec<i64>>,
}

/// Body of `POST /exercises`: an unnamed workout built from exercise ids.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachExercises {
    pub member_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id_list")]
    pub exercise_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutCreated {
    pub workout_id: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameWorkout {
    pub new_name: Option<String>,
}

/// A workout with its exercises resolved, in the workout's own order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedWorkout {
    pub workout_id: i64,
    pub member_id: i64,
    pub workout_name: String,
    pub exercises: Vec<Exercise>,
}

impl DetailedWorkout {
    /// Ids missing from `catalog` are skipped.
    pub fn assemble(workout: Workout, catalog: &[Exercise]) -> Self {
        let exercises = workout
            .exercise_ids
            .iter()
            .filter_map(|id| catalog.iter().find(|e| e.id == *id).cloned())
            .collect();

        Self {
            workout_id: workout.workout_id,
            member_id: workout.member_id,
            workout_name: workout.workout_name,
            exercises,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(id: i64, title: &str) -> Exercise {
        Exercise {
            id,
            title: title.to_string(),
            equipment: "Barbell".to_string(),
            difficulty: "Intermediate".to_string(),
        }
    }

    #[test]
    fn test_assemble_keeps_workout_order_and_skips_unknown_ids() {
        let workout = Workout {
            workout_id: 1,
            member_id: 2,
            workout_name: "Push".to_string(),
            exercise_ids: vec![3, 99, 1],
        };
        let catalog = vec![exercise(1, "Bench Press"), exercise(3, "Dip")];

        let detailed = DetailedWorkout::assemble(workout, &catalog);

        let titles: Vec<_> = detailed.exercises.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Dip", "Bench Press"]);
        assert_eq!(detailed.workout_name, "Push");
    }

    #[test]
    fn test_create_workout_reads_camel_case() {
        let body: CreateWorkout =
            serde_json::from_str(r#"{"workoutName":"Legs","exerciseIds":[4,5]}"#).unwrap();
        assert_eq!(body.workout_name.as_deref(), Some("Legs"));
        assert_eq!(body.exercise_ids, Some(vec![4, 5]));
    }

    #[test]
    fn test_non_array_exercise_ids_read_as_missing() {
        let body: AttachExercises =
            serde_json::from_str(r#"{"memberId":1,"exerciseIds":"5,6"}"#).unwrap();
        assert_eq!(body.member_id, Some(1));
        assert_eq!(body.exercise_ids, None);
    }
}
