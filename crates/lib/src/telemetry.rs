//! # Validation Telemetry
//!
//! Score entries describe how well a model response matched the expected
//! output contract. They are collected per request and handed to a
//! [`ScoreSink`] as one batch. Sinks are fire-and-forget: a failing collector
//! never affects the response sent to the caller.

use reqwest::Client as ReqwestClient;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info, warn};

/// A single named judgment about a model response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreEntry {
    pub name: String,
    /// `1.0` for a pass, `0.0` for a fail.
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ScoreEntry {
    pub fn pass(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: 1.0,
            reason: None,
        }
    }

    pub fn fail(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: 0.0,
            reason: Some(reason.into()),
        }
    }

    pub fn passed(&self) -> bool {
        self.value >= 1.0
    }
}

/// A destination for score batches.
pub trait ScoreSink: Send + Sync + Debug {
    /// Records all scores of one request under its trace id.
    fn submit(&self, trace_id: &str, scores: Vec<ScoreEntry>);
}

/// Writes score batches to the `tracing` log.
#[derive(Debug, Clone, Default)]
pub struct LogScoreSink;

impl ScoreSink for LogScoreSink {
    fn submit(&self, trace_id: &str, scores: Vec<ScoreEntry>) {
        for score in &scores {
            info!(
                trace_id,
                score = %score.name,
                value = score.value,
                reason = score.reason.as_deref().unwrap_or(""),
                "Validation score"
            );
        }
    }
}

#[derive(Serialize, Debug)]
struct ScoreBatch<'a> {
    trace_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    workspace: Option<&'a str>,
    scores: Vec<ScoreEntry>,
}

/// Posts score batches as JSON to an HTTP collector.
///
/// Each batch is sent on its own tokio task, so `submit` must be called from
/// within a tokio runtime.
#[derive(Debug, Clone)]
pub struct HttpScoreSink {
    client: ReqwestClient,
    endpoint: String,
    api_key: Option<String>,
    workspace: Option<String>,
    project_name: Option<String>,
}

impl HttpScoreSink {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        workspace: Option<String>,
        project_name: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: ReqwestClient::builder().build()?,
            endpoint,
            api_key,
            workspace,
            project_name,
        })
    }
}

impl ScoreSink for HttpScoreSink {
    fn submit(&self, trace_id: &str, scores: Vec<ScoreEntry>) {
        let body = match serde_json::to_value(ScoreBatch {
            trace_id,
            project_name: self.project_name.as_deref(),
            workspace: self.workspace.as_deref(),
            scores,
        }) {
            Ok(body) => body,
            Err(e) => {
                warn!(trace_id, "Failed to serialize score batch: {e}");
                return;
            }
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", key);
        }
        if let Some(workspace) = &self.workspace {
            request = request.header("Comet-Workspace", workspace);
        }

        let trace_id = trace_id.to_string();
        tokio::spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(trace_id = %trace_id, "Score batch delivered.");
                }
                Ok(response) => {
                    warn!(
                        trace_id = %trace_id,
                        status = %response.status(),
                        "Telemetry collector rejected score batch."
                    );
                }
                Err(e) => warn!(trace_id = %trace_id, "Failed to deliver score batch: {e}"),
            }
        });
    }
}
