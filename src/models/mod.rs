pub mod exercise;
pub mod from_row;
pub mod gym_membership;
pub mod member;
pub mod metrics;
pub mod numeric;
pub mod workout;
pub mod workout_log;

pub use exercise::{Exercise, NewExercise};
pub use from_row::FromSqliteRow;
pub use gym_membership::{GymMembership, SetGymMembership};
pub use member::{
    AuthResponse, LoginRequest, Member, NewMember, NewMetrics, SafeData, SignupRequest,
    UpdateUserInfo, UserInfo, UsernameAvailability, WorkoutSummary,
};
pub use metrics::MemberMetrics;
pub use workout::{
    AttachExercises, CreateWorkout, DetailedWorkout, RenameWorkout, Workout, WorkoutCreated,
};
pub use workout_log::{CreateWorkoutLog, WorkoutLog, WorkoutLogCreated};
