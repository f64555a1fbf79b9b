//! # General Route Handlers
//!
//! The root greeting and the health check.

use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

/// The handler for the root (`/`) endpoint.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Willkommen zur Vertagger API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}
