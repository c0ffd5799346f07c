//! SAGE survey backend
//!
//! Generates surveys through an LLM, collects responses over a public HTML form,
//! and analyses them. SQLite is the system of record.

mod api;
mod config;
mod db;
mod errors;
mod events;
mod llm;
mod models;
mod render;
mod summary;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::SurveyStore;
use events::EventHub;
use llm::{CompletionClient, GeminiClient};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SurveyStore>,
    pub events: EventHub,
    pub llm: Arc<dyn CompletionClient>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SAGE backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Public URL: {}", config.public_url);

    if config.llm.api_key.is_none() {
        tracing::warn!("No LLM key configured (GEMINI_API_KEY). Survey generation and analysis will fail!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let store = Arc::new(SurveyStore::new(pool, config.public_url.clone()));

    let llm: Arc<dyn CompletionClient> = Arc::new(GeminiClient::new(config.llm.clone())?);

    let state = AppState {
        store,
        events: EventHub::new(),
        llm,
        config: Arc::new(config.clone()),
    };

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

    let api_routes = Router::new()
        // Surveys
        .route("/surveys", get(api::list_surveys).post(api::create_survey))
        .route("/surveys/{id}", get(api::get_survey))
        .route("/surveys/{id}/summary", get(api::get_survey_summary))
        // Responses
        .route(
            "/surveys/{id}/responses",
            get(api::list_responses).post(api::submit_response),
        )
        // Analysis
        .route("/surveys/{id}/analysis", post(api::analyze_survey))
        .route(
            "/analyses",
            get(api::list_individual_analyses).post(api::create_individual_analysis),
        );

    let public_routes = Router::new()
        .route("/", get(api::service_status))
        .route("/health", get(health_check))
        .route("/survey/{id}", get(api::display_survey))
        .route("/survey/{id}/qr", get(api::survey_qr))
        .route("/ws", get(events::ws_handler));

    Router::new()
        .nest("/api", api_routes)
        .merge(public_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
