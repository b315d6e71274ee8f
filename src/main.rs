//! CodeHunt Backend
//!
//! REST backend for a six-phase campus scavenger hunt: team registration,
//! phase-gated submissions, and leaderboard/admin views over a pluggable
//! team store (in-memory or SQLite).

mod api;
mod auth;
mod config;
mod content;
mod db;
mod errors;
mod models;
mod progression;
mod validator;
mod views;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use db::TeamStore;
use progression::Progression;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TeamStore>,
    pub progression: Arc<Progression>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn TeamStore>, config: Config) -> Self {
        Self {
            progression: Arc::new(Progression::new(Arc::clone(&store))),
            store,
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Starting CodeHunt Backend");
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.admin_psk.is_none() {
        tracing::warn!("No admin PSK configured (CODEHUNT_ADMIN_PSK). Admin routes are open!");
    }

    let store = db::open_store(&config).await?;
    tracing::info!("Team store: {}", store.backend_name());

    let state = AppState::new(store, config.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.admin_psk.clone();

    let admin_routes = Router::new()
        .route("/teams", get(api::list_teams))
        .route("/teams/{teamId}", delete(api::delete_team))
        .route("/stats", get(api::get_stats))
        .route("/clear-all", delete(api::clear_all_teams))
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_auth_layer(psk.clone(), req, next)
        }));

    let api_routes = Router::new()
        // Teams
        .route("/teams/register", post(api::register_team))
        .route("/teams/{teamName}", get(api::get_team_by_name))
        // Phases
        .route("/phase1/submit", post(api::submit_phase1))
        .route("/phase2/questions", get(api::phase2_questions))
        .route("/phase2/check-answer", post(api::check_phase2_answer))
        .route("/phase2/complete", post(api::complete_phase2))
        .route("/phase2/submit", post(api::submit_phase2))
        .route("/phase3/questions", get(api::phase3_questions))
        .route("/phase3/submit", post(api::submit_phase3))
        .route("/phase4/code", get(api::phase4_code))
        .route("/phase4/submit", post(api::submit_phase4))
        .route("/phase5/riddles", get(api::phase5_riddles))
        .route("/phase5/answer", post(api::check_phase5_answer))
        .route("/phase5/complete", post(api::complete_phase5))
        .route("/phase6/submit", post(api::submit_phase6))
        .route("/location-riddle/{stage}", get(api::location_riddle))
        // Views
        .route("/leaderboard", get(api::get_leaderboard))
        .route("/health", get(api::health_check))
        .nest("/admin", admin_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
