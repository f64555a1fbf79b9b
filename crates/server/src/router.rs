use super::{handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub const EXTRACT_METADATA_PATH: &str = "/api/v1.0/extract_metadata";

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            EXTRACT_METADATA_PATH,
            post(handlers::extract_metadata_handler),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
