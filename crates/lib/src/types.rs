use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

// --- Request payload ---

/// A news article as it is posted to the extraction endpoint.
///
/// Field names on the wire follow the newsroom's CMS export (`ArtikelID`,
/// `Titel`, ...). The identifier may arrive as a string or an integer and is
/// kept as an opaque string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleInput {
    #[serde(rename = "ArtikelID", deserialize_with = "string_or_number")]
    pub artikel_id: String,
    #[serde(rename = "Titel")]
    pub titel: String,
    #[serde(rename = "Subtitel", default)]
    pub subtitel: Option<String>,
    #[serde(rename = "Teaser", default)]
    pub teaser: Option<String>,
    #[serde(rename = "Text", default)]
    pub text: Option<String>,
}

impl ArticleInput {
    /// Creates an article with only the identifier and title set.
    pub fn new(artikel_id: impl Into<String>, titel: impl Into<String>) -> Self {
        Self {
            artikel_id: artikel_id.into(),
            titel: titel.into(),
            subtitel: None,
            teaser: None,
            text: None,
        }
    }

    /// Returns all fields as `(label, value)` pairs in the canonical prompt order.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("ArtikelID", Some(self.artikel_id.as_str())),
            ("Titel", Some(self.titel.as_str())),
            ("Subtitel", self.subtitel.as_deref()),
            ("Teaser", self.teaser.as_deref()),
            ("Text", self.text.as_deref()),
        ]
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

// --- Response payload ---

/// The enriched metadata returned for an article.
///
/// Every field the model may leave out defaults to empty, and an explicit
/// `null` is read the same way. `artikel_id` is never taken from the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleOutput {
    #[serde(default)]
    pub artikel_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub personen: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub organisationen: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub regionen: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stichwoerter: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zusammenfassung: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub userneeds: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audiences: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audience_1_begruendung: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audience_2_begruendung: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audience_3_begruendung: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub iab_content_taxonomy: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Prompt and model call ---

/// The assembled system prompt. Built once at startup and shared read-only.
#[derive(Clone, PartialEq, Eq)]
pub struct PromptDocument {
    text: Arc<str>,
    fragment_count: usize,
}

impl PromptDocument {
    pub fn new(text: impl Into<Arc<str>>, fragment_count: usize) -> Self {
        Self {
            text: text.into(),
            fragment_count,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The number of fragments the document was assembled from.
    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }
}

impl fmt::Debug for PromptDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptDocument")
            .field("fragment_count", &self.fragment_count)
            .field("len", &self.text.len())
            .finish()
    }
}

/// Everything needed for one completion call.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub system_prompt: PromptDocument,
    pub user_content: String,
    pub model: String,
    pub temperature: f32,
    /// Ask the provider to guarantee a syntactically valid JSON object.
    pub json_mode: bool,
}
