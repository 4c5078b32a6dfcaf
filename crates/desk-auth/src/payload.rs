//! Request bodies sent to and payloads received from the auth endpoints.

use std::fmt;

use desk_core::{User, lenient};
use desk_session::Session;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// `POST /login` body.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `POST /register` body.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation_name: Option<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("organisation_name", &self.organisation_name)
            .finish_non_exhaustive()
    }
}

/// `PUT /user/profile` body. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// `POST /user/change-password` body.
#[derive(Clone, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub password: String,
    pub password_confirmation: String,
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}

/// `POST /password/reset` body.
#[derive(Clone, Serialize)]
pub struct PasswordReset {
    pub token: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl fmt::Debug for PasswordReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordReset")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// `POST /email/verify` body.
#[derive(Debug, Clone, Serialize)]
pub struct EmailVerification {
    pub token: String,
}

#[derive(Serialize)]
pub(crate) struct EmailOnly<'a> {
    pub email: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// `data` of a login, register or refresh response.
#[derive(Deserialize)]
pub(crate) struct AuthPayload {
    #[serde(
        default,
        alias = "access_token",
        alias = "accessToken",
        deserialize_with = "lenient::non_blank"
    )]
    pub token: Option<String>,
    #[serde(default, alias = "refreshToken", deserialize_with = "lenient::non_blank")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default, alias = "firstTimeLogin", deserialize_with = "lenient::optional_flag")]
    pub first_time_login: Option<bool>,
}

impl AuthPayload {
    /// A full session. Token and user are both required.
    pub fn into_session(self) -> Result<Session, AuthError> {
        let token = self.token.ok_or(AuthError::MissingToken)?;
        let user = self.user.ok_or(AuthError::MissingUser)?;
        Ok(Session {
            token,
            refresh_token: self.refresh_token.or_else(|| user.refresh_token.clone()),
            first_time_login: self.first_time_login.unwrap_or(user.first_time_login),
            user: Some(user),
        })
    }
}

/// `data` of endpoints returning the user, bare or as `{ "user": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum UserPayload {
    Wrapped { user: User },
    Bare(User),
}

impl UserPayload {
    pub fn into_user(self) -> User {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}
