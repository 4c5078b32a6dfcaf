use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Storage(String),

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid token: {0}")]
    InvalidToken(String),
}
