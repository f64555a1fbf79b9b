//! # Article Service
//!
//! Runs the extraction for one article: build the user content, call the
//! model in JSON mode, validate the completion, report its scores and hand
//! back the typed metadata.

use crate::{
    constants::DEFAULT_MODEL,
    errors::ExtractionError,
    prompts::assemble_user_content,
    providers::ai::AiProvider,
    telemetry::{LogScoreSink, ScoreSink},
    types::{ArticleInput, ArticleOutput, ExtractionRequest, PromptDocument},
    validation::{OutputValidator, Verdict},
};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// The orchestrator behind the extraction endpoint.
///
/// All fields are immutable after [`ArticleServiceBuilder::build`], so one
/// instance is shared by every request.
#[derive(Debug, Clone)]
pub struct ArticleService {
    ai_provider: Box<dyn AiProvider>,
    system_prompt: PromptDocument,
    model: String,
    temperature: f32,
    score_sink: Arc<dyn ScoreSink>,
    validator: OutputValidator,
}

/// A builder for [`ArticleService`].
#[derive(Debug, Default)]
pub struct ArticleServiceBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    system_prompt: Option<PromptDocument>,
    model: Option<String>,
    temperature: Option<f32>,
    score_sink: Option<Arc<dyn ScoreSink>>,
    strict_enums: bool,
}

impl ArticleServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ai_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(provider);
        self
    }

    pub fn system_prompt(mut self, prompt: PromptDocument) -> Self {
        self.system_prompt = Some(prompt);
        self
    }

    /// Sets the model name. Defaults to [`DEFAULT_MODEL`].
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature. Defaults to `0.0`.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets where validation scores go. Defaults to [`LogScoreSink`].
    pub fn score_sink(mut self, sink: Arc<dyn ScoreSink>) -> Self {
        self.score_sink = Some(sink);
        self
    }

    /// Rejects responses whose `userneeds` or `audiences` fall outside the
    /// allowed values.
    pub fn strict_enums(mut self, strict: bool) -> Self {
        self.strict_enums = strict;
        self
    }

    pub fn build(self) -> Result<ArticleService, ExtractionError> {
        let ai_provider = self.ai_provider.ok_or(ExtractionError::MissingAiProvider)?;
        let system_prompt = self
            .system_prompt
            .ok_or(ExtractionError::MissingSystemPrompt)?;

        Ok(ArticleService {
            ai_provider,
            system_prompt,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(0.0),
            score_sink: self
                .score_sink
                .unwrap_or_else(|| Arc::new(LogScoreSink)),
            validator: OutputValidator::new().strict(self.strict_enums),
        })
    }
}

impl ArticleService {
    pub fn builder() -> ArticleServiceBuilder {
        ArticleServiceBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_prompt(&self) -> &PromptDocument {
        &self.system_prompt
    }

    /// Extracts metadata for one article.
    ///
    /// Each call gets a fresh trace id under which its scores are reported.
    /// The returned `artikel_id` always equals the input's, whatever the
    /// model echoed.
    pub async fn process_article(
        &self,
        article: &ArticleInput,
    ) -> Result<ArticleOutput, ExtractionError> {
        let trace_id = Uuid::new_v4().to_string();
        let span = info_span!(
            "process_article",
            trace_id = %trace_id,
            artikel_id = %article.artikel_id
        );
        self.run(article, &trace_id).instrument(span).await
    }

    async fn run(
        &self,
        article: &ArticleInput,
        trace_id: &str,
    ) -> Result<ArticleOutput, ExtractionError> {
        info!("Processing article.");

        let request = ExtractionRequest {
            system_prompt: self.system_prompt.clone(),
            user_content: assemble_user_content(article),
            model: self.model.clone(),
            temperature: self.temperature,
            json_mode: true,
        };

        let completion = self.ai_provider.complete(&request).await?;
        let raw = match completion {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                warn!("Model returned no content.");
                return Err(ExtractionError::EmptyCompletion);
            }
        };
        debug!(completion = %raw, "<-- Received completion");

        let report = self.validator.validate(&raw);
        self.score_sink.submit(trace_id, report.scores);

        match report.verdict {
            Verdict::Accepted(mut output) => {
                output.artikel_id = article.artikel_id.clone();
                info!("Article processed.");
                Ok(output)
            }
            Verdict::Rejected(rejection) => {
                warn!(reason = %rejection, "Model output rejected.");
                Err(ExtractionError::InvalidModelOutput(rejection))
            }
        }
    }
}
