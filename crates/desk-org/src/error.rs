use desk_core::{CoreError, FieldErrors};
use desk_http::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrgError {
    /// Rejected locally; no request was sent.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("organization {0} not found")]
    NotFound(String),
}

impl OrgError {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "validation",
            Self::Api(api) => api.kind(),
            Self::NotFound(_) => "not_found",
        }
    }

    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Api(api) => api.field_errors(),
            _ => None,
        }
    }
}
