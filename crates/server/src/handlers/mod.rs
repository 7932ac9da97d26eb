//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `mindscribe-server`.
//! The handlers are split into sub-modules by resource.

pub mod content;
pub mod general;
pub mod mood;
pub mod profile;
pub mod recommendations;
pub mod tasks;

// Re-export all handlers so the router can reach them under `handlers::`.
pub use content::*;
pub use general::*;
pub use mood::*;
pub use profile::*;
pub use recommendations::*;
pub use tasks::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState};
