use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repbook::config::Config;
use repbook::handlers::{auth, exercises, members, workouts};
use repbook::repositories::{
    ExerciseRepository, MemberRepository, MembershipRepository, WorkoutLogRepository,
    WorkoutRepository,
};
use repbook::version::GIT_VERSION;
use repbook::{db, migrations, routes, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repbook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env();

    tracing::info!("repbook {} starting", GIT_VERSION);
    tracing::info!("Connecting to database: {}", config.database_url);

    let pool = db::create_pool(&config.database_url)?;
    migrations::run_migrations(&pool)?;

    let member_repo = MemberRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let membership_repo = MembershipRepository::new(pool.clone());
    let log_repo = WorkoutLogRepository::new(pool.clone());

    if let Some(path) = &config.exercise_seed_path {
        seed::seed_exercises(&exercise_repo, path).await?;
    }

    let auth_state = auth::AuthState {
        member_repo: member_repo.clone(),
    };
    let members_state = members::MembersState {
        member_repo: member_repo.clone(),
        membership_repo,
        workout_repo: workout_repo.clone(),
        exercise_repo: exercise_repo.clone(),
    };
    let workouts_state = workouts::WorkoutsState {
        member_repo: member_repo.clone(),
        workout_repo: workout_repo.clone(),
        exercise_repo: exercise_repo.clone(),
        log_repo,
    };
    let exercises_state = exercises::ExercisesState {
        member_repo,
        exercise_repo,
        workout_repo,
    };

    let app = routes::create_router(auth_state, members_state, workouts_state, exercises_state);

    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
