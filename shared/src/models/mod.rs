//! Data models
//!
//! Shared between dapur-server and the SPA (via API).
//! DB enums use `#[cfg_attr(feature = "db", derive(sqlx::Type))]`.
//! All IDs are UUID v4 strings, all timestamps are UTC epoch milliseconds.

pub mod category;
pub mod menu_item;
pub mod order;
pub mod serde_helpers;
pub mod stats;
pub mod user;

// Re-exports
pub use category::*;
pub use menu_item::*;
pub use order::*;
pub use stats::*;
pub use user::*;

use thiserror::Error;

/// A string did not name a variant of one of the closed enumerations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
