//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port. The OpenAI endpoint is
//! an `httpmock::MockServer`, the prompt is written to a temporary directory
//! and validation scores are captured by a `RecordingScoreSink`.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::{Method, Mock, MockServer};
use reqwest::Client;
use serde_json::{json, Value};
use std::{fs, net::SocketAddr, path::Path, sync::Arc};
use tempfile::TempDir;
use tokio::{net::TcpListener, task::JoinHandle};
use vertagger::{
    assemble_system_prompt, providers::ai::openai::OpenAiProvider, ArticleService, PromptSource,
};
use vertagger_server::{
    config::{AppConfig, OpenAiConfig, TelemetryConfig, ValidationConfig},
    router::{create_router, EXTRACT_METADATA_PATH},
    state::AppState,
};
use vertagger_test_utils::RecordingScoreSink;

pub const TEST_API_KEY: &str = "test-api-key";
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const SYSTEM_PROMPT_MARKER: &str = "Du bist ein Test-Dokumentar.";

/// Writes a two-fragment prompt directory and returns its source description.
pub fn write_prompt_dir(dir: &Path) -> PromptSource {
    let prompts = dir.join("prompts");
    fs::create_dir_all(&prompts).unwrap();
    fs::write(prompts.join("00_rolle.txt"), SYSTEM_PROMPT_MARKER).unwrap();
    fs::write(prompts.join("10_format.txt"), "Antworte als JSON.").unwrap();
    PromptSource::Directory {
        path: prompts,
        fragments: vec!["00_rolle".to_string(), "10_format".to_string()],
    }
}

/// A configuration pointing the provider at `api_url`.
pub fn test_config(api_url: String, prompts: PromptSource) -> AppConfig {
    AppConfig {
        port: 0,
        api_key: TEST_API_KEY.to_string(),
        openai: OpenAiConfig {
            api_url,
            api_key: "sk-test".to_string(),
            model_name: "gpt-4o-mini".to_string(),
            temperature: 0.0,
        },
        prompts,
        telemetry: TelemetryConfig::default(),
        validation: ValidationConfig::default(),
    }
}

/// A chat-completions body whose single choice carries `content`.
pub fn completion_body(content: Option<&str>) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub scores: RecordingScoreSink,
    _prompt_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server with soft enum validation.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(false).await
    }

    pub async fn spawn_with(strict_enums: bool) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start_async().await;
        let prompt_dir = tempfile::tempdir()?;
        let prompts = write_prompt_dir(prompt_dir.path());

        let mut config = test_config(mock_server.url(COMPLETIONS_PATH), prompts);
        config.validation.strict_enums = strict_enums;

        let scores = RecordingScoreSink::new();
        let service = ArticleService::builder()
            .ai_provider(Box::new(OpenAiProvider::new(
                config.openai.api_url.clone(),
                Some(config.openai.api_key.clone()),
            )?))
            .system_prompt(assemble_system_prompt(&config.prompts)?)
            .model(config.openai.model_name.clone())
            .temperature(config.openai.temperature)
            .score_sink(Arc::new(scores.clone()))
            .strict_enums(strict_enums)
            .build()?;

        let app_state = AppState::new(config, service);
        Self::spawn_with_state(app_state, mock_server, scores, prompt_dir).await
    }

    pub async fn spawn_with_state(
        app_state: AppState,
        mock_server: MockServer,
        scores: RecordingScoreSink,
        prompt_dir: TempDir,
    ) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            scores,
            _prompt_dir: prompt_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Makes the mocked model answer every completion request with `content`.
    pub async fn mock_completion(&self, content: Option<&str>) -> Mock<'_> {
        let body = completion_body(content);
        self.mock_server
            .mock_async(|when, then| {
                when.method(Method::POST).path(COMPLETIONS_PATH);
                then.status(200).json_body(body);
            })
            .await
    }

    /// Makes the mocked model answer with a bare HTTP status.
    pub async fn mock_status(&self, status: u16) -> Mock<'_> {
        self.mock_server
            .mock_async(|when, then| {
                when.method(Method::POST).path(COMPLETIONS_PATH);
                then.status(status)
                    .json_body(json!({"error": {"message": "mocked failure"}}));
            })
            .await
    }

    /// Posts `payload` to the extraction endpoint with the given key.
    pub async fn extract(&self, payload: &Value, api_key: Option<&str>) -> reqwest::Response {
        let mut request = self
            .client
            .post(format!("{}{}", self.address, EXTRACT_METADATA_PATH))
            .json(payload);
        if let Some(key) = api_key {
            request = request.header("X-API-Key", key);
        }
        request.send().await.expect("Failed to execute request.")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // The receiver might already be gone if the server task panicked.
            let _ = tx.send(());
        }
    }
}
