use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use vertagger::errors::ExtractionError;
use vertagger::providers::ai::AiProvider;
use vertagger::telemetry::{ScoreEntry, ScoreSink};
use vertagger::types::ExtractionRequest;

// --- Mock AI Provider ---

/// A scripted response for [`MockAiProvider`].
#[derive(Clone, Debug)]
pub enum MockReply {
    Content(String),
    Empty,
    RateLimited,
    ApiError(String),
}

/// An in-memory provider that replays scripted replies in order.
///
/// Once the script is exhausted, the last reply is repeated. Every request is
/// recorded for later assertions.
#[derive(Clone, Debug, Default)]
pub struct MockAiProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    last: Arc<Mutex<Option<MockReply>>>,
    calls: Arc<Mutex<Vec<ExtractionRequest>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that always answers with `content`.
    pub fn with_content(content: &str) -> Self {
        let provider = Self::new();
        provider.push(MockReply::Content(content.to_string()));
        provider
    }

    pub fn with_reply(reply: MockReply) -> Self {
        let provider = Self::new();
        provider.push(reply);
        provider
    }

    pub fn push(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Retrieves the recorded requests for assertion.
    pub fn get_calls(&self) -> Vec<ExtractionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn complete(
        &self,
        request: &ExtractionRequest,
    ) -> Result<Option<String>, ExtractionError> {
        self.calls.lock().unwrap().push(request.clone());

        let reply = {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.replies.lock().unwrap().pop_front() {
                *last = Some(next);
            }
            last.clone().unwrap_or(MockReply::Empty)
        };

        match reply {
            MockReply::Content(content) => Ok(Some(content)),
            MockReply::Empty => Ok(None),
            MockReply::RateLimited => Err(ExtractionError::RateLimited),
            MockReply::ApiError(message) => Err(ExtractionError::AiApi(message)),
        }
    }
}

// --- Recording Score Sink ---

/// A score sink that keeps every submitted batch in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingScoreSink {
    batches: Arc<Mutex<Vec<(String, Vec<ScoreEntry>)>>>,
}

impl RecordingScoreSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> Vec<(String, Vec<ScoreEntry>)> {
        self.batches.lock().unwrap().clone()
    }

    /// All scores across batches, flattened in submission order.
    pub fn scores(&self) -> Vec<ScoreEntry> {
        self.batches()
            .into_iter()
            .flat_map(|(_, scores)| scores)
            .collect()
    }

    pub fn score(&self, name: &str) -> Option<ScoreEntry> {
        self.scores().into_iter().find(|s| s.name == name)
    }
}

impl ScoreSink for RecordingScoreSink {
    fn submit(&self, trace_id: &str, scores: Vec<ScoreEntry>) {
        self.batches
            .lock()
            .unwrap()
            .push((trace_id.to_string(), scores));
    }
}

// --- Fixtures ---

/// A complete, valid model response as a JSON string.
pub fn valid_completion() -> String {
    serde_json::json!({
        "personen": ["Anna Beispiel"],
        "organisationen": ["Stadtrat Zürich"],
        "regionen": ["Zürich"],
        "stichwoerter": ["Velo", "Verkehr"],
        "zusammenfassung": "Der Stadtrat baut neue Velowege.",
        "userneeds": "Informieren",
        "audiences": ["Verkehrsteilnehmende", "Sporttreibende"],
        "audience_1_begruendung": "Betrifft den Verkehr.",
        "audience_2_begruendung": "Velofahren ist Sport.",
        "audience_3_begruendung": "",
        "iab_content_taxonomy": "Automotive"
    })
    .to_string()
}
