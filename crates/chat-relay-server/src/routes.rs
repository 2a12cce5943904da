use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::{info, warn};

use crate::handlers;
use crate::state::AppState;
use crate::utils::error::panic_response;

pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/chatbot", post(handlers::chat::chatbot_handler))
        .route("/api/rag", post(handlers::chat::rag_handler))
        .route("/api/llama", post(handlers::llama::llama_handler))
        .with_state(state);

    // Chat widget
    let router = match static_dir {
        Some(dir) if dir.is_dir() => {
            info!("Serving static files from {}", dir.display());
            api_routes.fallback_service(ServeDir::new(dir))
        }
        Some(dir) => {
            warn!("Static directory {} not found, widget not served", dir.display());
            api_routes
        }
        None => api_routes,
    };

    router
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        // A panicking handler becomes a 500, never a dead process
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(DefaultBodyLimit::max(1024 * 1024))
}
