//! Top-level router assembly

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::cache::CacheStats;
use crate::{blog, design, marketplace, projects, quote, AppState};

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(design::router())
        .merge(quote::router())
        .merge(marketplace::router())
        .merge(blog::router())
        .merge(projects::router());

    let cors = if state.config.cors_allow_any {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .nest_service("/media", ServeDir::new(&state.config.media_root))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    cache: CacheStats,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.cache.stats(),
    })
}
