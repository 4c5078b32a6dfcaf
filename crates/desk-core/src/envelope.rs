//! The JSON envelope every backend endpoint answers with.
//!
//! ```json
//! { "success": true, "data": { ... }, "message": "...", "errors": { "email": ["taken"] } }
//! ```
//!
//! The transport layer decodes into `ApiResponse<serde_json::Value>`; services
//! then narrow `data` to a concrete type with [`ApiResponse::decode`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Validation messages keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// A `success: false` envelope, with `data` already discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rejection {
    pub message: Option<String>,
    pub errors: Option<FieldErrors>,
}

impl Rejection {
    /// The server's message, or `default` when it gave none.
    #[must_use]
    pub fn message_or(&self, default: &str) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| default.to_string())
    }
}

impl<T> ApiResponse<T> {
    /// A successful envelope wrapping `data`.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            errors: None,
        }
    }

    /// An envelope carrying only `success` and `message`.
    pub const fn minimal(success: bool, message: Option<String>) -> Self {
        Self {
            success,
            data: None,
            message,
            error: None,
            errors: None,
        }
    }

    /// First non-blank of `message`, `error`, else `default`.
    #[must_use]
    pub fn failure_message(&self, default: &str) -> String {
        self.server_message()
            .unwrap_or_else(|| default.to_string())
    }

    /// First non-blank of `message` and `error`.
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        [self.message.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|m| !m.is_empty())
            .map(String::from)
    }

    /// Hand out `data` only when `success` is true.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] when the envelope reports failure.
    pub fn into_data(self) -> Result<Option<T>, Rejection> {
        if self.success {
            Ok(self.data)
        } else {
            Err(Rejection {
                message: self.server_message(),
                errors: self.errors,
            })
        }
    }
}

impl ApiResponse<Value> {
    /// Narrow the untyped `data` payload to `T`.
    ///
    /// A `null` payload decodes as `None`.
    ///
    /// # Errors
    ///
    /// Returns the serde error when `data` does not match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<ApiResponse<T>, serde_json::Error> {
        let data = match self.data {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value)?),
        };
        Ok(ApiResponse {
            success: self.success,
            data,
            message: self.message,
            error: self.error,
            errors: self.errors,
        })
    }
}
