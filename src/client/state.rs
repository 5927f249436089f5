//! Single-owner view state. Network results arrive as [`StateUpdate`]s and
//! are applied in arrival order by one task; observers read snapshots.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::models::{
    AuthResponse, DetailedWorkout, Exercise, MemberMetrics, UserInfo, Workout, WorkoutLog,
};

use super::AuthState;

#[derive(Debug, Clone)]
pub enum StateUpdate {
    SignedIn(AuthResponse),
    SignedOut,
    UsernameAvailability { username: String, available: bool },
    UserInfo(UserInfo),
    Workouts(Vec<Workout>),
    WorkoutRenamed { workout_id: i64, new_name: String },
    WorkoutDeleted(i64),
    DetailedWorkout(DetailedWorkout),
    Metrics(Vec<MemberMetrics>),
    Exercises(Vec<Exercise>),
    Logs(Vec<WorkoutLog>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub auth: AuthState,
    pub username_check: Option<(String, bool)>,
    pub user_info: Option<UserInfo>,
    pub workouts: Vec<Workout>,
    pub detailed_workout: Option<DetailedWorkout>,
    pub metrics: Vec<MemberMetrics>,
    pub exercises: Vec<Exercise>,
    pub logs: Vec<WorkoutLog>,
    pub last_error: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(AuthState::Unauthenticated)
    }
}

impl ViewState {
    pub fn new(auth: AuthState) -> Self {
        Self {
            auth,
            username_check: None,
            user_info: None,
            workouts: Vec::new(),
            detailed_workout: None,
            metrics: Vec::new(),
            exercises: Vec::new(),
            logs: Vec::new(),
            last_error: None,
        }
    }

    pub fn apply(&mut self, update: StateUpdate) {
        if !matches!(update, StateUpdate::Failed(_)) {
            self.last_error = None;
        }

        match update {
            StateUpdate::SignedIn(creds) => self.auth = AuthState::Authenticated(creds),
            StateUpdate::SignedOut => *self = Self::new(AuthState::Unauthenticated),
            StateUpdate::UsernameAvailability {
                username,
                available,
            } => self.username_check = Some((username, available)),
            StateUpdate::UserInfo(info) => self.user_info = Some(info),
            StateUpdate::Workouts(workouts) => self.workouts = workouts,
            StateUpdate::WorkoutRenamed {
                workout_id,
                new_name,
            } => {
                if let Some(w) = self.workouts.iter_mut().find(|w| w.workout_id == workout_id) {
                    w.workout_name = new_name.clone();
                }
                if let Some(d) = self
                    .detailed_workout
                    .as_mut()
                    .filter(|d| d.workout_id == workout_id)
                {
                    d.workout_name = new_name;
                }
            }
            StateUpdate::WorkoutDeleted(workout_id) => {
                self.workouts.retain(|w| w.workout_id != workout_id);
                if self
                    .detailed_workout
                    .as_ref()
                    .is_some_and(|d| d.workout_id == workout_id)
                {
                    self.detailed_workout = None;
                }
            }
            StateUpdate::DetailedWorkout(detailed) => self.detailed_workout = Some(detailed),
            StateUpdate::Metrics(metrics) => self.metrics = metrics,
            StateUpdate::Exercises(exercises) => self.exercises = exercises,
            StateUpdate::Logs(logs) => self.logs = logs,
            StateUpdate::Failed(message) => self.last_error = Some(message),
        }
    }
}

/// Runs until every sender is dropped. Returns the sender to feed and a
/// receiver that always holds the latest snapshot.
pub fn spawn_state_loop(
    initial: ViewState,
) -> (
    mpsc::Sender<StateUpdate>,
    watch::Receiver<ViewState>,
    JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::channel::<StateUpdate>(64);
    let (snapshot_tx, snapshot_rx) = watch::channel(initial.clone());

    let handle = tokio::spawn(async move {
        let mut state = initial;
        while let Some(update) = rx.recv().await {
            state.apply(update);
            // Observers may all be gone; keep draining updates regardless
            let _ = snapshot_tx.send(state.clone());
        }
        tracing::debug!("State loop finished");
    });

    (tx, snapshot_rx, handle)
}
