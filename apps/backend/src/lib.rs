//! HTTP backend for the flashdeck study service.

pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::services::ai::{CardGenerator, GeminiGenerator};
use crate::services::library::{Library, ScoreStore};
use crate::services::sessions::SessionStore;

/// Shared application state. Sessions sit behind one async mutex, which
/// also serializes distractor generation so a slow upstream call cannot
/// be raced by a second request for the same session.
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<RwLock<Library>>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub scores: Arc<Mutex<ScoreStore>>,
    pub generator: Arc<dyn CardGenerator>,
}

impl AppState {
    pub fn new(library: Library, scores: ScoreStore, generator: Arc<dyn CardGenerator>) -> Self {
        Self {
            library: Arc::new(RwLock::new(library)),
            sessions: Arc::new(Mutex::new(SessionStore::new())),
            scores: Arc::new(Mutex::new(scores)),
            generator,
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}

/// Build the application router. Extracted from [`run`] so integration
/// tests can mount it on an in-process server.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/sets", get(routes::sets::list).post(routes::sets::create))
        .route("/api/sets/import", post(routes::sets::import))
        .route("/api/sets/{topic}", get(routes::sets::get_set))
        .route("/api/sets/{topic}/export", get(routes::sets::export))
        .route(
            "/api/sets/{topic}/cards/{card_id}/star",
            post(routes::sets::toggle_star),
        )
        .route("/api/generate/cards", post(routes::generate::cards))
        .route("/api/sessions/write", post(routes::sessions::start_write))
        .route(
            "/api/sessions/write/{id}/answer",
            post(routes::sessions::answer_write),
        )
        .route("/api/sessions/learn", post(routes::sessions::start_learn))
        .route(
            "/api/sessions/learn/{id}/check",
            post(routes::sessions::check_learn),
        )
        .route(
            "/api/sessions/learn/{id}/report",
            post(routes::sessions::report_learn),
        )
        .route("/api/sessions/test", post(routes::sessions::start_test))
        .route(
            "/api/sessions/test/{id}/answer",
            post(routes::sessions::answer_test),
        )
        .route("/api/sessions/match", post(routes::sessions::start_match))
        .route(
            "/api/sessions/match/{id}/select",
            post(routes::sessions::select_match),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the backend server.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flashdeck_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = std::env::var("STUDY_DATA_DIR").unwrap_or_else(|_| "./data".to_string());
    let library = Library::open(&data_dir)?;
    let scores = ScoreStore::open(std::path::Path::new(&data_dir).join("scores.json"));
    let generator = Arc::new(GeminiGenerator::from_env());

    let app = build_router(AppState::new(library, scores, generator));

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
