use crate::{
    errors::ExtractionError, providers::ai::AiProvider, types::ExtractionRequest,
};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{debug, warn};

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    stream: bool,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

// --- Provider implementation ---

/// A provider for the OpenAI chat-completions API or any compatible endpoint.
///
/// The underlying `reqwest` client keeps its connection pool for the lifetime
/// of the provider, so one instance is shared across all requests.
#[derive(Clone, Debug)]
pub struct OpenAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl OpenAiProvider {
    /// Creates a new `OpenAiProvider`.
    pub fn new(api_url: String, api_key: Option<String>) -> Result<Self, ExtractionError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(ExtractionError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn complete(
        &self,
        request: &ExtractionRequest,
    ) -> Result<Option<String>, ExtractionError> {
        let request_body = ChatCompletionRequest {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.system_prompt.as_str(),
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_content,
                },
            ],
            temperature: request.temperature,
            response_format: request.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
            stream: false,
        };
        debug!(
            model = %request.model,
            user_content = %request.user_content,
            "--> Sending chat completion request"
        );

        let mut request_builder = self.client.post(&self.api_url);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(ExtractionError::AiRequest)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("AI provider signalled rate limiting.");
            return Err(ExtractionError::RateLimited);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ExtractionError::AiApi(format!("{status}: {error_text}")));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(ExtractionError::AiDeserialization)?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}
