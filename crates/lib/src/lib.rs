//! # Vertagger
//!
//! Metadata enrichment for news articles. An article is sent to a language
//! model together with a system prompt assembled from editorial fragments; the
//! JSON the model returns is validated against the newsroom's closed value sets
//! before it is handed back as [`ArticleOutput`].
//!
//! The entry point is [`ArticleService`], configured through
//! [`ArticleServiceBuilder`].

pub mod constants;
pub mod errors;
pub mod prompts;
pub mod providers;
pub mod service;
pub mod telemetry;
pub mod types;
pub mod validation;

pub use errors::{ExtractionError, PromptSourceError};
pub use prompts::{assemble_system_prompt, assemble_user_content, PromptSource};
pub use service::{ArticleService, ArticleServiceBuilder};
pub use telemetry::{HttpScoreSink, LogScoreSink, ScoreEntry, ScoreSink};
pub use types::{ArticleInput, ArticleOutput, ExtractionRequest, PromptDocument};
pub use validation::{OutputValidator, Rejection, ValidationReport, Verdict};
