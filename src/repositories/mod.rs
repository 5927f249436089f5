pub mod exercise_repo;
pub mod member_repo;
pub mod membership_repo;
pub mod workout_log_repo;
pub mod workout_repo;

pub use exercise_repo::ExerciseRepository;
pub use member_repo::MemberRepository;
pub use membership_repo::MembershipRepository;
pub use workout_log_repo::WorkoutLogRepository;
pub use workout_repo::WorkoutRepository;
