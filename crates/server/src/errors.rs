use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use vertagger::{ExtractionError, Rejection};

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from `vertagger`.
    Extraction(ExtractionError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::Extraction(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Extraction(err) => match err {
                ExtractionError::RateLimited => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "OpenAI Rate Limit überschritten.".to_string(),
                ),
                ExtractionError::EmptyCompletion => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "OpenAI hat eine leere Antwort zurückgegeben.".to_string(),
                ),
                ExtractionError::InvalidModelOutput(rejection) => {
                    let prefix = match rejection {
                        Rejection::Syntax(_) => "LLM-Antwort war kein valides JSON.",
                        Rejection::Schema(_) => "LLM-Antwort entspricht nicht dem Ausgabeschema.",
                        Rejection::Domain(_) => "LLM-Antwort enthält ungültige Werte.",
                    };
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("{prefix} {}", rejection.reason()),
                    )
                }
                ExtractionError::AiRequest(e) => (
                    StatusCode::BAD_GATEWAY,
                    format!("Anfrage an OpenAI fehlgeschlagen: {e}"),
                ),
                ExtractionError::AiDeserialization(e) => (
                    StatusCode::BAD_GATEWAY,
                    format!("Antwort von OpenAI konnte nicht gelesen werden: {e}"),
                ),
                ExtractionError::AiApi(e) => {
                    (StatusCode::BAD_GATEWAY, format!("OpenAI-Fehler: {e}"))
                }
                ExtractionError::ReqwestClientBuild(_)
                | ExtractionError::MissingAiProvider
                | ExtractionError::MissingSystemPrompt => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Der Server ist nicht korrekt konfiguriert.".to_string(),
                ),
            },
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Ein interner Serverfehler ist aufgetreten.".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Extraction(err) => error!("ExtractionError: {:?}", err),
            AppError::Internal(err) => error!("Internal server error: {:?}", err),
        }
        let (status_code, error_message) = self.status_and_message();

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
