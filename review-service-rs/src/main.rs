// review-service-rs/src/main.rs
// Review-generation service - HTTP entry point

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::{Json, Router};
use once_cell::sync::Lazy;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use review_service::pipeline::{self, AppState};
use review_service::validation::MAX_PAYLOAD_SIZE;

// Track service start time for uptime reporting
static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service_name: String,
    pub uptime_seconds: i64,
    pub status: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        service_name: "review-service".to_string(),
        uptime_seconds: START_TIME.elapsed().as_secs() as i64,
        status: "ok".to_string(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load environment variables
    dotenv::dotenv().ok();

    Lazy::force(&START_TIME);

    // Get service port from env or use default
    let port = env::var("REVIEW_SERVICE_PORT").unwrap_or_else(|_| "8080".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    let state = Arc::new(AppState::from_env()?);

    // Single generate endpoint; axum answers other verbs on the path with
    // 405 and an Allow: POST header.
    let app = Router::new()
        .route("/api/v1/generate", post(pipeline::generate_article))
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(RequestBodyLimitLayer::new(MAX_PAYLOAD_SIZE))
        .with_state(state);

    log::info!("Review service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
