//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
    Router,
};
use imgvault_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Headroom over the file size limit for multipart framing, so an oversize
/// file body is rejected by the storage writer (which cleans up the partial
/// file) instead of the transport cutting the request off.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/upload/", post(handlers::upload::upload_image))
        .route("/count/", get(handlers::count::get_upload_count))
        .route("/verify-admin/", post(handlers::admin::verify_admin))
        .with_state(state);

    // Static frontend at the root path; API routes above take precedence.
    if let Some(frontend_dir) = &config.frontend_dir {
        app = app.fallback_service(
            ServeDir::new(frontend_dir).append_index_html_on_directories(true),
        );
    }

    app.layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            config.max_file_size + MULTIPART_OVERHEAD,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
