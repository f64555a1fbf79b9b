//! # Prompt Assembly
//!
//! This module builds the two messages sent to the model for every article:
//! the system prompt, assembled once at startup from an ordered set of text
//! fragments, and the per-article user content.

pub mod article;
pub mod system;

pub use article::assemble_user_content;
pub use system::{assemble_system_prompt, PromptSource};
