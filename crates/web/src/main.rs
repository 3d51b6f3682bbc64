use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use chess_trainer_core::{EnginePort, GameSession, ReplaySession, StandardOracle, UciEngine};

mod config;
mod routes;

use config::TrainerConfig;

pub type Session = GameSession<StandardOracle, UciEngine>;

pub struct AppState {
    pub config: TrainerConfig,
    pub session: Mutex<Session>,
    pub replay: Mutex<Option<ReplaySession>>,
}

impl AppState {
    pub fn new(config: TrainerConfig, session: Session) -> Self {
        Self {
            config,
            session: Mutex::new(session),
            replay: Mutex::new(None),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/analyze", post(routes::analysis::analyze))
        .route("/replay/step", post(routes::analysis::replay_step))
        .route("/game/new", post(routes::game::new_game))
        .route("/game/move", post(routes::game::play_move))
        .route("/game/engine", post(routes::game::engine_move))
        .route("/game/hint", get(routes::game::hint))
        .route("/game/tactic", post(routes::game::tactic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn engine_port(config: &TrainerConfig) -> EnginePort<UciEngine> {
    let path = match &config.stockfish_path {
        Some(path) => path,
        None => {
            tracing::info!("STOCKFISH_PATH not set - computer moves use the greedy fallback");
            return EnginePort::unavailable();
        }
    };

    match UciEngine::spawn(path, config.engine_level.skill()).await {
        Ok(engine) => {
            tracing::info!(path = %path, "engine started");
            EnginePort::new(engine)
        }
        Err(e) => {
            tracing::warn!(
                path = %path,
                error = %e,
                "engine failed to start, using greedy fallback"
            );
            EnginePort::unavailable()
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = TrainerConfig::from_env();

    let port = engine_port(&config).await;
    let mut session = GameSession::new(StandardOracle, port, config.engine_level)
        .expect("Failed to set up game session");
    session.set_depth_override(config.engine_depth);

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, session));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind address");

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
