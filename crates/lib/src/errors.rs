use crate::validation::Rejection;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting metadata for a single article.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider rate limit exceeded")]
    RateLimited,
    #[error("AI provider returned an empty completion")]
    EmptyCompletion,
    #[error("Model output failed validation: {0}")]
    InvalidModelOutput(Rejection),
    #[error("AI provider is missing")]
    MissingAiProvider,
    #[error("System prompt is missing")]
    MissingSystemPrompt,
}

/// Errors raised while assembling the system prompt at startup.
///
/// None of these are recoverable at request time; a process that hits one
/// must not start serving.
#[derive(Error, Debug)]
pub enum PromptSourceError {
    #[error("Prompt source not found at '{}'", .0.display())]
    NotFound(PathBuf),
    #[error("No prompt fragments found in '{}'", .0.display())]
    Empty(PathBuf),
    #[error("Prompt fragment '{id}' not found in '{}'", .path.display())]
    MissingFragment { id: String, path: PathBuf },
    #[error("Failed to read prompt source '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid prompt document '{}': {message}", .path.display())]
    Document { path: PathBuf, message: String },
}
