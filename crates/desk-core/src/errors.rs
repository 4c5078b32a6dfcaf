//! Cross-cutting error types for orgdesk.
//!
//! Transport, session and service errors live in their own crates. This module
//! only covers failures that can be detected on plain data, before any request
//! is sent.

use thiserror::Error;

/// Errors raised while constructing or decoding domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (missing required field, empty value, bad format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
