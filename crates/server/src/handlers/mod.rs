//! # API Route Handlers
//!
//! This module organizes the Axum route handlers for the `vertagger-server`.

pub mod extraction;
pub mod general;

// Re-export all handlers so the router can reach them under `handlers::`.
pub use extraction::*;
pub use general::*;

use super::{errors::AppError, state::AppState};
