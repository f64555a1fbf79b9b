//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. Everything in it is read-only after startup and
//! shared by all request handlers.

use crate::config::{non_empty, AppConfig};
use std::sync::Arc;
use tracing::info;
use vertagger::{
    assemble_system_prompt,
    providers::ai::{openai::OpenAiProvider, AiProvider},
    ArticleService, HttpScoreSink, LogScoreSink, ScoreSink,
};

/// The shared application state, accessible from all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// The extraction pipeline, holding the assembled prompt and the provider client.
    pub service: Arc<ArticleService>,
}

impl AppState {
    pub fn new(config: AppConfig, service: ArticleService) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }
}

/// Builds the shared application state from the configuration.
///
/// Assembles the system prompt, creates the provider client and chooses the
/// score sink. Any failure here must keep the server from starting.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let system_prompt = assemble_system_prompt(&config.prompts)?;

    let ai_provider: Box<dyn AiProvider> = Box::new(OpenAiProvider::new(
        config.openai.api_url.clone(),
        Some(config.openai.api_key.clone()),
    )?);

    let score_sink: Arc<dyn ScoreSink> = match config.telemetry.endpoint() {
        Some(endpoint) => {
            info!(endpoint, "Reporting validation scores to telemetry collector.");
            Arc::new(HttpScoreSink::new(
                endpoint.to_string(),
                non_empty(config.telemetry.api_key.as_deref()).map(String::from),
                non_empty(config.telemetry.workspace.as_deref()).map(String::from),
                non_empty(config.telemetry.project_name.as_deref()).map(String::from),
            )?)
        }
        None => {
            info!("No telemetry endpoint configured, validation scores are logged only.");
            Arc::new(LogScoreSink)
        }
    };

    let service = ArticleService::builder()
        .ai_provider(ai_provider)
        .system_prompt(system_prompt)
        .model(config.openai.model_name.clone())
        .temperature(config.openai.temperature)
        .score_sink(score_sink)
        .strict_enums(config.validation.strict_enums)
        .build()?;

    info!(
        model = %service.model(),
        fragments = service.system_prompt().fragment_count(),
        strict_enums = config.validation.strict_enums,
        "Extraction service ready."
    );

    Ok(AppState::new(config, service))
}
