//! # desk-auth
//!
//! Sign-in and account operations for orgdesk.
//!
//! [`AuthService`] moves the persisted session between anonymous and
//! authenticated: login and registration store a full session only when the
//! server returns both a token and a user, logout always ends anonymous
//! locally, and a failed token refresh clears everything.

mod error;
mod payload;
mod service;

pub use error::AuthError;
pub use payload::{
    Credentials, EmailVerification, PasswordChange, PasswordReset, ProfileUpdate, Registration,
};
pub use service::{AVATAR_FIELD, AuthService};
