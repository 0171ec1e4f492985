//! Image Search API Server
//!
//! Accepts image submissions, tags them through Imagga and moderates them
//! against an operator-configured NSFW threshold and label blacklist.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{ImaggaClient, PostgresConfigStore, PostgresImageRepository};
use app::IntakeService;
use config::Config;
use domain::ports::{ConfigStore, ImageRepository, TaggingProvider};

/// Application state shared across all handlers
pub struct AppState<TP, CS, IR>
where
    TP: TaggingProvider,
    CS: ConfigStore,
    IR: ImageRepository,
{
    pub intake_service: Arc<IntakeService<TP, CS, IR>>,
    pub images: Arc<IR>,
}

// Manual impl: derive(Clone) would require the port types to be Clone
impl<TP, CS, IR> Clone for AppState<TP, CS, IR>
where
    TP: TaggingProvider,
    CS: ConfigStore,
    IR: ImageRepository,
{
    fn clone(&self) -> Self {
        Self {
            intake_service: self.intake_service.clone(),
            images: self.images.clone(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the API router over any set of port implementations
pub fn build_router<TP, CS, IR>(state: AppState<TP, CS, IR>) -> Router
where
    TP: TaggingProvider + 'static,
    CS: ConfigStore + 'static,
    IR: ImageRepository + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route(
            "/images",
            post(handlers::submit_image::<TP, CS, IR>).get(handlers::list_images::<TP, CS, IR>),
        )
        .route("/images/:id", get(handlers::get_image::<TP, CS, IR>))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,imagesearch_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Image Search API...");

    // Load configuration
    let config = Config::from_env();
    if !config.imagga_configured() {
        tracing::warn!("IMAGGA_API_KEY or IMAGGA_API_SECRET not set, provider calls will fail");
    }

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Create adapters
    let image_repo = Arc::new(PostgresImageRepository::new(db.clone()));
    let config_store = Arc::new(PostgresConfigStore::new(db.clone()));
    let imagga = Arc::new(
        ImaggaClient::new(
            config.imagga_api_url.clone(),
            config.imagga_api_key.clone(),
            config.imagga_api_secret.clone(),
        )
        .with_language(config.imagga_language.clone()),
    );

    // Create application services
    let intake_service = Arc::new(IntakeService::new(
        imagga,
        config_store,
        image_repo.clone(),
        config.default_safety_threshold,
    ));

    let state = AppState {
        intake_service,
        images: image_repo,
    };

    let app = build_router(state)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
