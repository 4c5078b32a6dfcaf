use desk_core::{ApiResponse, Organization, User};
use desk_http::{ApiClient, ApiError, FileUpload, QueryParams, expect_data};
use desk_session::{Session, TokenStore};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::AuthError;
use crate::payload::{
    AuthPayload, Credentials, EmailOnly, EmailVerification, PasswordChange, PasswordReset,
    ProfileUpdate, RefreshRequest, Registration, UserPayload,
};

/// Field name the backend expects for avatar uploads.
pub const AVATAR_FIELD: &str = "avatar";

/// Session lifecycle and account operations.
///
/// The service is the only writer of the [`TokenStore`] it shares with its
/// [`ApiClient`]. The HTTP client may still clear it on a 401 or an expired
/// token.
#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[must_use]
    pub const fn session(&self) -> &TokenStore {
        self.api.session()
    }

    // --- Sign-in ---

    /// `POST /login`. Stores the session only when the response carries both
    /// a token and a user.
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingToken`] / [`AuthError::MissingUser`] for an
    /// incomplete response, [`AuthError::Api`] for request failures and
    /// [`AuthError::Session`] when the session cannot be persisted.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        logged("login", self.authenticate("/login", credentials, "Login failed").await)
    }

    /// `POST /register`. Same contract as [`Self::login`].
    ///
    /// # Errors
    ///
    /// See [`Self::login`].
    pub async fn register(&self, registration: &Registration) -> Result<Session, AuthError> {
        logged(
            "register",
            self.authenticate("/register", registration, "Registration failed")
                .await,
        )
    }

    async fn authenticate<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        default_message: &str,
    ) -> Result<Session, AuthError> {
        let envelope = self.api.post(endpoint, body).await?;
        let session = expect_data::<AuthPayload>(envelope, default_message)?
            .ok_or(AuthError::MissingToken)?
            .into_session()?;

        self.session().store_session(&session)?;
        if let Some(user) = &session.user {
            tracing::info!(
                user_id = %user.id,
                first_time_login = session.first_time_login,
                "signed in"
            );
        }
        Ok(session)
    }

    /// `POST /logout`, then clear the local session.
    ///
    /// The remote call is best-effort: its failures are logged and dropped.
    /// The local clear always runs, last.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Session`] only if the local clear fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        if self.session().token().is_some() {
            match self.api.post("/logout", &json!({})).await {
                Ok(envelope) if !envelope.success => {
                    tracing::warn!(
                        message = %envelope.failure_message("Logout failed"),
                        "remote logout rejected; clearing local session anyway"
                    );
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(%error, "remote logout failed; clearing local session anyway");
                }
            }
        }

        self.session().clear()?;
        tracing::info!("signed out");
        Ok(())
    }

    /// `POST /token/refresh` with the stored refresh token.
    ///
    /// On success the token is replaced. The refresh token and user are
    /// replaced when the response carries them and kept otherwise. Any
    /// failure clears the session.
    ///
    /// # Errors
    ///
    /// [`AuthError::NoRefreshToken`] when none is stored, otherwise as for
    /// [`Self::login`].
    pub async fn refresh_token(&self) -> Result<Session, AuthError> {
        let result = self.try_refresh().await;
        if let Err(error) = &result {
            tracing::warn!(%error, "token refresh failed; clearing session");
            self.session().clear_quietly();
        }
        result
    }

    async fn try_refresh(&self) -> Result<Session, AuthError> {
        let store = self.session();
        let refresh_token = store.refresh_token().ok_or(AuthError::NoRefreshToken)?;
        // Read before the request: an expired access token clears the store.
        let previous_user = store.user();
        let previous_flag = store.first_time_login();

        let envelope = self
            .api
            .post(
                "/token/refresh",
                &RefreshRequest {
                    refresh_token: &refresh_token,
                },
            )
            .await?;
        let payload = expect_data::<AuthPayload>(envelope, "Token refresh failed")?
            .ok_or(AuthError::MissingToken)?;

        let session = Session {
            token: payload.token.ok_or(AuthError::MissingToken)?,
            refresh_token: payload.refresh_token.or(Some(refresh_token)),
            first_time_login: payload.first_time_login.unwrap_or(previous_flag),
            user: payload.user.or(previous_user),
        };
        store.store_session(&session)?;
        tracing::debug!("access token refreshed");
        Ok(session)
    }

    // --- Current user ---

    /// The cached user, or a fresh `GET /user` when nothing is cached.
    ///
    /// A cached user is returned as-is even if the server copy has changed.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_user`].
    pub async fn current_user(&self) -> Result<User, AuthError> {
        match self.session().user() {
            Some(user) => Ok(user),
            None => self.fetch_user().await,
        }
    }

    /// `GET /user`, caching the result.
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingUser`] when the response has no user,
    /// [`AuthError::Api`] for request failures.
    pub async fn fetch_user(&self) -> Result<User, AuthError> {
        logged("fetch user", self.load_user().await)
    }

    async fn load_user(&self) -> Result<User, AuthError> {
        let envelope = self.api.get("/user", QueryParams::new()).await?;
        let user = expect_data::<UserPayload>(envelope, "Failed to load user")?
            .ok_or(AuthError::MissingUser)?
            .into_user();
        self.cache_user(user)
    }

    fn cache_user(&self, user: User) -> Result<User, AuthError> {
        self.session().set_user(Some(&user))?;
        Ok(user)
    }

    /// The organization of the current user, `None` when the user has none.
    ///
    /// # Errors
    ///
    /// See [`Self::current_user`]; [`AuthError::Api`] for the lookup itself.
    pub async fn user_organization(&self) -> Result<Option<Organization>, AuthError> {
        let user = self.current_user().await?;
        if user.organisation_id.is_none() {
            return Ok(None);
        }

        let organization = self
            .api
            .get("/user/organisation", QueryParams::new())
            .await
            .and_then(|envelope| {
                expect_data::<Organization>(envelope, "Failed to load organization")
            })
            .map_err(AuthError::from);
        logged("user organization", organization)
    }

    // --- Account operations ---

    /// `PUT /user/profile`. Refreshes the cached user.
    ///
    /// # Errors
    ///
    /// [`AuthError::Api`] carrying the server message or
    /// "Failed to update profile".
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, AuthError> {
        logged("update profile", self.send_profile(update).await)
    }

    async fn send_profile(&self, update: &ProfileUpdate) -> Result<User, AuthError> {
        let envelope = self.api.put("/user/profile", update).await?;
        match expect_data::<UserPayload>(envelope, "Failed to update profile")? {
            Some(payload) => self.cache_user(payload.into_user()),
            None => self.load_user().await,
        }
    }

    /// `POST /user/change-password`. Returns the server's confirmation text.
    ///
    /// # Errors
    ///
    /// [`AuthError::Api`] carrying the server message or
    /// "Failed to change password".
    pub async fn change_password(&self, change: &PasswordChange) -> Result<String, AuthError> {
        logged(
            "change password",
            self.send_for_message(
                "/user/change-password",
                change,
                "Failed to change password",
                "Password changed successfully",
            )
            .await,
        )
    }

    /// `POST /password/forgot`.
    ///
    /// # Errors
    ///
    /// [`AuthError::Api`] carrying the server message or
    /// "Failed to send password reset email".
    pub async fn request_password_reset(&self, email: &str) -> Result<String, AuthError> {
        logged(
            "request password reset",
            self.send_for_message(
                "/password/forgot",
                &EmailOnly { email },
                "Failed to send password reset email",
                "Password reset email sent",
            )
            .await,
        )
    }

    /// `POST /password/reset`.
    ///
    /// # Errors
    ///
    /// [`AuthError::Api`] carrying the server message or
    /// "Failed to reset password".
    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<String, AuthError> {
        logged(
            "reset password",
            self.send_for_message(
                "/password/reset",
                reset,
                "Failed to reset password",
                "Password reset successfully",
            )
            .await,
        )
    }

    /// `POST /email/verify`.
    ///
    /// # Errors
    ///
    /// [`AuthError::Api`] carrying the server message or
    /// "Failed to verify email".
    pub async fn verify_email(
        &self,
        verification: &EmailVerification,
    ) -> Result<String, AuthError> {
        logged(
            "verify email",
            self.send_for_message(
                "/email/verify",
                verification,
                "Failed to verify email",
                "Email verified successfully",
            )
            .await,
        )
    }

    /// `POST /email/resend`.
    ///
    /// # Errors
    ///
    /// [`AuthError::Api`] carrying the server message or
    /// "Failed to resend verification email".
    pub async fn resend_email_verification(&self) -> Result<String, AuthError> {
        logged(
            "resend verification",
            self.send_for_message(
                "/email/resend",
                &json!({}),
                "Failed to resend verification email",
                "Verification email sent",
            )
            .await,
        )
    }

    /// `POST /user/avatar` as multipart, file under the `avatar` field.
    /// Refreshes the cached user.
    ///
    /// # Errors
    ///
    /// [`AuthError::Api`] carrying the server message or
    /// "Failed to upload avatar".
    pub async fn upload_avatar(&self, file: FileUpload) -> Result<User, AuthError> {
        let file = FileUpload {
            field: AVATAR_FIELD.to_string(),
            ..file
        };
        logged("upload avatar", self.send_avatar(file).await)
    }

    async fn send_avatar(&self, file: FileUpload) -> Result<User, AuthError> {
        let envelope = self.api.upload("/user/avatar", file, &[]).await?;
        if !envelope.success {
            return Err(rejected(&envelope, "Failed to upload avatar"));
        }
        // Some backends answer with `{ avatar_url }` only; re-fetch then.
        match envelope.decode::<UserPayload>().ok().and_then(|typed| typed.data) {
            Some(payload) => self.cache_user(payload.into_user()),
            None => self.load_user().await,
        }
    }

    async fn send_for_message<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        failure_default: &str,
        success_default: &str,
    ) -> Result<String, AuthError> {
        let envelope = self.api.post(endpoint, body).await?;
        if !envelope.success {
            return Err(rejected(&envelope, failure_default));
        }
        Ok(envelope
            .server_message()
            .unwrap_or_else(|| success_default.to_string()))
    }

    // --- Local state ---

    /// A token is stored and not expired. No network.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    #[must_use]
    pub fn is_first_time_login(&self) -> bool {
        self.session().first_time_login()
    }

    #[must_use]
    pub fn cached_user(&self) -> Option<User> {
        self.session().user()
    }

    /// Initials of the cached user, empty when none is cached.
    #[must_use]
    pub fn user_initials(&self) -> String {
        self.cached_user()
            .map(|user| user.initials())
            .unwrap_or_default()
    }
}

fn rejected(envelope: &ApiResponse<Value>, default_message: &str) -> AuthError {
    ApiError::Rejected {
        message: envelope.failure_message(default_message),
        errors: envelope.errors.clone(),
    }
    .into()
}

fn logged<T>(operation: &'static str, result: Result<T, AuthError>) -> Result<T, AuthError> {
    if let Err(error) = &result {
        tracing::warn!(operation, kind = error.kind(), %error, "auth operation failed");
    }
    result
}
