//! # Extraction Handler
//!
//! `POST /api/v1.0/extract_metadata`: enriches a single article.

use super::{AppError, AppState};
use crate::auth::middleware::ApiKey;
use axum::{extract::State, Json};
use tracing::{debug, info};
use vertagger::{ArticleInput, ArticleOutput};

/// Runs the extraction pipeline for the posted article.
///
/// The `ApiKey` extractor rejects unauthenticated calls before the body is
/// read.
pub async fn extract_metadata_handler(
    _api_key: ApiKey,
    State(app_state): State<AppState>,
    Json(article): Json<ArticleInput>,
) -> Result<Json<ArticleOutput>, AppError> {
    info!(artikel_id = %article.artikel_id, "Received extraction request.");
    debug!(?article, "Extraction payload");

    let output = app_state.service.process_article(&article).await?;
    Ok(Json(output))
}
