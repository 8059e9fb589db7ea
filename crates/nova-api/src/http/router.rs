//! Axum router configuration with middleware.
//!
//! Middleware: CORS, request tracing.
//!
//! When a web directory is configured (`server.web_dir`, overridden by
//! `NOVA_WEB_DIR`) and exists, its pages are served for every path the API
//! does not claim, falling back to `index.html`.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

pub const WEB_DIR_ENV: &str = "NOVA_WEB_DIR";

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let web_dir = std::env::var(WEB_DIR_ENV)
        .ok()
        .or_else(|| state.config.server.web_dir.clone());

    let api_routes = Router::new()
        .route("/chat/stream", post(handlers::chat::stream_chat))
        .route("/model", post(handlers::model::switch_model))
        .route("/models", get(handlers::model::list_models));

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/process", post(handlers::process::process))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(web_dir) = web_dir.filter(|dir| std::path::Path::new(dir).exists()) {
        let index_path = format!("{web_dir}/index.html");
        let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir, "static page serving enabled");
    }

    router
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
