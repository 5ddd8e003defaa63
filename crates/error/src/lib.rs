//! # prodex-error
//!
//! Unified error types for the Prodex product query API.
//!
//! All errors carry:
//! - Numeric error codes (PRODEX-XXXX)
//! - A human-readable message
//! - An optional actionable hint

mod code;
mod convert;

pub use code::{ErrorCategory, ErrorCode};
pub use convert::find_closest_match;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The unified error type for all Prodex operations.
///
/// Its serde form is the API error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProdexError {
    /// Numeric error code (e.g., "PRODEX-2002")
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ProdexError {
    /// Create a new error with code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }

    /// Add an actionable hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Whether this error indicates the live schema no longer matches the
    /// one the query was built against. Callers drop cached column sets
    /// when they see this.
    pub fn is_schema_mismatch(&self) -> bool {
        self.code == ErrorCode::SchemaUnavailable
    }

    /// Serialize to JSON for API responses
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize ProdexError: {}", e);
            format!(
                r#"{{"code":"{}","message":"Serialization failed"}}"#,
                self.code
            )
        })
    }
}

impl fmt::Display for ProdexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (Hint: {})", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProdexError {}

/// Result type alias for Prodex operations
pub type Result<T> = std::result::Result<T, ProdexError>;
