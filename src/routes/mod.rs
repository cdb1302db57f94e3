//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers); adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/api/v1/", get(http::http_root))
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/students", post(http::http_create_student))
        .route("/api/v1/students/:student_id", get(http::http_get_student))
        .route("/api/v1/students/:student_id/progress", get(http::http_get_progress))
        .route("/api/v1/students/:student_id/submit_quest", post(http::http_submit_quest))
        .route("/api/v1/students/:student_id/generate_hint", post(http::http_generate_hint))
        .route("/api/v1/quests", get(http::http_list_quests))
        .route("/api/v1/quests/:quest_id", get(http::http_get_quest))
        .route("/api/v1/leaderboard", get(http::http_leaderboard))
        .route("/api/v1/badges", get(http::http_badges))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
