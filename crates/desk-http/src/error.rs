//! HTTP client error types.

use std::time::Duration;

use desk_core::FieldErrors;
use thiserror::Error;

/// Every way a request can fail, distinguishable by variant.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not complete within the client timeout.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// No response: connection refused, DNS failure, reset, TLS error.
    #[error("network error: {0}")]
    Network(String),

    /// HTTP 401. The stored session has already been cleared.
    #[error("authentication required")]
    Unauthorized,

    /// Any other non-2xx status.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        errors: Option<FieldErrors>,
    },

    /// The body claimed to be JSON but was not, or `data` did not have the
    /// expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// 2xx envelope with `success: false`.
    #[error("{message}")]
    Rejected {
        message: String,
        errors: Option<FieldErrors>,
    },

    /// The request could not be built (bad header value, unusable URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Stable short name for logs and CLI output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Network(_) => "network",
            Self::Unauthorized => "unauthorized",
            Self::Http { .. } => "http",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Rejected { .. } => "rejected",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }

    /// HTTP status, when the failure came with one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Per-field validation messages, when the server sent any.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Http { errors, .. } | Self::Rejected { errors, .. } => errors.as_ref(),
            _ => None,
        }
    }
}
