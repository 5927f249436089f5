pub mod auth;
pub mod exercises;
pub mod health;
pub mod members;
pub mod workouts;
