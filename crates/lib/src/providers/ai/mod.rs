pub mod openai;

use crate::{errors::ExtractionError, types::ExtractionRequest};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a generative model provider.
///
/// Implementations send the system prompt and the user content of an
/// [`ExtractionRequest`] to the model and hand back the raw completion text.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Requests a single completion.
    ///
    /// Returns `Ok(None)` when the provider answered without any content.
    /// Throttling by the provider must surface as [`ExtractionError::RateLimited`].
    async fn complete(&self, request: &ExtractionRequest)
        -> Result<Option<String>, ExtractionError>;
}

dyn_clone::clone_trait_object!(AiProvider);
