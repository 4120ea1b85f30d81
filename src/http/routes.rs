use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let prefix = state.plugin.route_prefix();

    // The page itself is gated; every other file in the web root is static
    let assets = ServeDir::new(&state.plugin.web_root).append_index_html_on_directories(false);

    let plugin = Router::new()
        .route("/main", get(handlers::main_page))
        .route("/index.html", get(handlers::main_page))
        .fallback_service(assets);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .nest(&prefix, plugin)
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
