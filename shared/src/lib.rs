//! Shared types for the Dapur ordering backend
//!
//! Domain models, the unified error system and the API response envelope
//! used by the server and mirrored by the SPA.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
