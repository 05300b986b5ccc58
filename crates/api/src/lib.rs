pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clips arrive base64-encoded inside JSON
    let upload_limit = DefaultBodyLimit::max(state.settings.server.upload_body_limit_bytes);

    let api = Router::new()
        .route("/evaluate", post(routes::evaluate::evaluate))
        .route("/recordings", post(routes::recording::create))
        .route("/students", get(routes::student::lookup))
        .route("/questions", get(routes::question::select))
        .route("/results", post(routes::results::summarize))
        .route("/upload", post(routes::upload::upload).layer(upload_limit));

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
