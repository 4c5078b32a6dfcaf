use std::fmt;
use std::sync::Arc;

use desk_core::User;

use crate::error::SessionError;
use crate::expiry::is_token_expired;
use crate::storage::{MemoryStorage, SessionStorage};

const KEY_TOKEN: &str = "orgdesk.auth_token";
const KEY_REFRESH_TOKEN: &str = "orgdesk.refresh_token";
const KEY_FIRST_TIME_LOGIN: &str = "orgdesk.first_time_login";
const KEY_USER: &str = "orgdesk.user";

const ALL_KEYS: [&str; 4] = [KEY_TOKEN, KEY_REFRESH_TOKEN, KEY_FIRST_TIME_LOGIN, KEY_USER];

/// Everything persisted for a signed-in user.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub refresh_token: Option<String>,
    pub first_time_login: bool,
    pub user: Option<User>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("first_time_login", &self.first_time_login)
            .field("user", &self.user)
            .finish()
    }
}

/// Single source of truth for the persisted session.
///
/// Cheap to clone; clones share the same storage. All operations are
/// synchronous. Read failures are logged and reported as "absent" so a broken
/// backend degrades to the anonymous state rather than a half-valid one.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn SessionStorage>,
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("backend", &self.storage.name())
            .finish()
    }
}

impl TokenStore {
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    #[must_use]
    pub fn from_shared(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// A store backed by [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.storage.name()
    }

    // --- Token ---

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read(KEY_TOKEN).filter(|t| !t.is_empty())
    }

    /// # Errors
    ///
    /// Returns [`SessionError`] if the backend write fails.
    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        self.storage.set(KEY_TOKEN, token)
    }

    // --- Refresh token ---

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read(KEY_REFRESH_TOKEN).filter(|t| !t.is_empty())
    }

    /// `None` removes the stored refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the backend write fails.
    pub fn set_refresh_token(&self, refresh_token: Option<&str>) -> Result<(), SessionError> {
        match refresh_token.filter(|t| !t.is_empty()) {
            Some(value) => self.storage.set(KEY_REFRESH_TOKEN, value),
            None => self.storage.remove(KEY_REFRESH_TOKEN),
        }
    }

    // --- First-time-login flag ---

    #[must_use]
    pub fn first_time_login(&self) -> bool {
        self.read(KEY_FIRST_TIME_LOGIN)
            .and_then(|raw| serde_json::from_str::<bool>(&raw).ok())
            .unwrap_or(false)
    }

    /// # Errors
    ///
    /// Returns [`SessionError`] if the backend write fails.
    pub fn set_first_time_login(&self, value: bool) -> Result<(), SessionError> {
        self.storage
            .set(KEY_FIRST_TIME_LOGIN, &serde_json::to_string(&value)?)
    }

    // --- Cached user ---

    /// The cached user. A record that no longer decodes is treated as absent.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        let raw = self.read(KEY_USER)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(error) => {
                tracing::warn!(%error, "cached user is unreadable; ignoring it");
                None
            }
        }
    }

    /// `None` removes the cached user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if serialization or the backend write fails.
    pub fn set_user(&self, user: Option<&User>) -> Result<(), SessionError> {
        match user {
            Some(user) => self.storage.set(KEY_USER, &serde_json::to_string(user)?),
            None => self.storage.remove(KEY_USER),
        }
    }

    // --- Whole session ---

    /// The stored session, if a token is present.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        Some(Session {
            token: self.token()?,
            refresh_token: self.refresh_token(),
            first_time_login: self.first_time_login(),
            user: self.user(),
        })
    }

    /// Persist a whole session.
    ///
    /// If any write fails, everything is cleared before the error is
    /// returned, so a partially written session never looks valid.
    ///
    /// # Errors
    ///
    /// Returns the first [`SessionError`] encountered.
    pub fn store_session(&self, session: &Session) -> Result<(), SessionError> {
        let result = self
            .set_token(&session.token)
            .and_then(|()| self.set_refresh_token(session.refresh_token.as_deref()))
            .and_then(|()| self.set_first_time_login(session.first_time_login))
            .and_then(|()| self.set_user(session.user.as_ref()));

        if let Err(error) = result {
            tracing::warn!(%error, "failed to persist session; rolling back");
            if let Err(clear_error) = self.clear() {
                tracing::warn!(%clear_error, "rollback after failed session write also failed");
            }
            return Err(error);
        }
        Ok(())
    }

    /// Remove all four session keys.
    ///
    /// Every key is attempted even if an earlier removal fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`SessionError`] encountered.
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut first_error = None;
        for key in ALL_KEYS {
            if let Err(error) = self.storage.remove(key) {
                tracing::warn!(%error, key, "failed to clear session key");
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Clear the session, logging instead of returning a failure.
    pub fn clear_quietly(&self) {
        let _ = self.clear();
    }

    // --- Checks ---

    /// A token is stored and is not expired. No network round-trip.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|token| !is_token_expired(&token))
    }

    /// The stored token if it is still valid.
    ///
    /// An expired token clears the whole session as a side effect.
    #[must_use]
    pub fn valid_token(&self) -> Option<String> {
        let token = self.token()?;
        if is_token_expired(&token) {
            tracing::info!("stored token expired; clearing session");
            self.clear_quietly();
            return None;
        }
        Some(token)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%error, key, "failed to read session key");
                None
            }
        }
    }
}
