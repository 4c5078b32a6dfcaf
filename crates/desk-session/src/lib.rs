//! # desk-session
//!
//! Session persistence for orgdesk.
//!
//! Provides the [`TokenStore`] (auth token, refresh token, first-time-login
//! flag, cached user), pluggable durable storage (OS keychain via `keyring`,
//! a `0600` JSON file, or memory) and a local JWT expiry check that decodes
//! the payload without verifying the signature.

pub mod error;
pub mod expiry;
pub mod storage;
pub mod token_store;

pub use error::SessionError;
pub use expiry::{decode_expiry, is_token_expired};
pub use storage::{FallbackStorage, FileStorage, KeyringStorage, MemoryStorage, SessionStorage};
pub use token_store::{Session, TokenStore};
