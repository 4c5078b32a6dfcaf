use super::SessionStorage;
use crate::error::SessionError;

/// One OS keychain entry per session key, all under one service name.
#[derive(Debug, Clone)]
pub struct KeyringStorage {
    service: String,
}

impl KeyringStorage {
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, SessionError> {
        keyring::Entry::new(&self.service, key).map_err(|e| SessionError::Keyring(e.to_string()))
    }
}

impl SessionStorage for KeyringStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        match self.entry(key)?.get_password() {
            Ok(value) if value.is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(SessionError::Keyring(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| SessionError::Keyring(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(SessionError::Keyring(e.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "keyring"
    }
}
