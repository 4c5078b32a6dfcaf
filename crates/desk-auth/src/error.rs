use desk_http::ApiError;
use desk_session::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("session store error: {0}")]
    Session(#[from] SessionError),

    #[error("sign-in response did not include a token")]
    MissingToken,

    #[error("sign-in response did not include a user")]
    MissingUser,

    #[error("no refresh token available; sign in again with `desk auth login`")]
    NoRefreshToken,
}

impl AuthError {
    /// The server answered 401 and the session is gone.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(ApiError::Unauthorized))
    }

    /// Stable short name for logs and CLI output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Api(api) => api.kind(),
            Self::Session(_) => "session",
            Self::MissingToken => "missing_token",
            Self::MissingUser => "missing_user",
            Self::NoRefreshToken => "no_refresh_token",
        }
    }
}
