//! # Authentication Middleware
//!
//! Provides the `ApiKey` extractor guarding the extraction endpoint. The key
//! travels in the `X-API-Key` header and is compared with the configured
//! `api_key`.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Marker extractor for a request that presented the correct API key.
///
/// Because it only reads request parts, it runs before any body extractor.
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

/// A custom rejection type for authentication failures.
pub struct AuthError(StatusCode, String);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        match presented {
            Some(key) if key == state.config.api_key => Ok(ApiKey),
            _ => {
                warn!(
                    present = presented.is_some(),
                    "Rejected request with invalid or missing API key."
                );
                Err(AuthError(
                    StatusCode::UNAUTHORIZED,
                    "Ungültiger oder fehlender API-Schlüssel".to_string(),
                ))
            }
        }
    }
}
