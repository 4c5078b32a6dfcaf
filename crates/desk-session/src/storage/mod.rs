//! Durable key-value storage behind the token store.
//!
//! The token store never touches a concrete backend; it holds an
//! `Arc<dyn SessionStorage>` so services can be tested against
//! [`MemoryStorage`] without patching the user's keychain or home directory.

mod file;
mod keychain;
mod memory;

pub use file::FileStorage;
pub use keychain::KeyringStorage;
pub use memory::MemoryStorage;

use crate::error::SessionError;

/// Synchronous string key-value storage.
pub trait SessionStorage: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Remove a key. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), SessionError>;

    /// Short backend name for status output (`keyring`, `file`, `memory`).
    fn name(&self) -> &'static str;
}

/// Keyring first, session file when the keyring is unavailable.
///
/// Mirrors the usual credential lookup order for CLIs: the OS keychain is
/// preferred, but headless machines without a secret service still work.
pub struct FallbackStorage<P = KeyringStorage, F = FileStorage> {
    primary: P,
    fallback: F,
}

impl<P: SessionStorage, F: SessionStorage> FallbackStorage<P, F> {
    #[must_use]
    pub const fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: SessionStorage, F: SessionStorage> SessionStorage for FallbackStorage<P, F> {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        match self.primary.get(key) {
            Ok(Some(value)) => return Ok(Some(value)),
            Ok(None) => {}
            Err(error) => tracing::debug!(%error, key, "keyring read failed; trying file"),
        }
        self.fallback.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        match self.primary.set(key, value) {
            Ok(()) => {
                // Drop any copy a previous fallback write left behind.
                if let Err(error) = self.fallback.remove(key) {
                    tracing::debug!(%error, key, "failed to remove stale file entry");
                }
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, key, "keyring store failed; falling back to file");
                if let Err(error) = self.primary.remove(key) {
                    tracing::debug!(%error, key, "failed to remove stale keyring entry");
                }
                self.fallback.set(key, value)
            }
        }
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        if let Err(error) = self.primary.remove(key) {
            tracing::warn!(%error, key, "keyring delete failed");
        }
        self.fallback.remove(key)
    }

    fn name(&self) -> &'static str {
        "keyring+file"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Unavailable;

    impl SessionStorage for Unavailable {
        fn get(&self, _key: &str) -> Result<Option<String>, SessionError> {
            Err(SessionError::Keyring("no secret service".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), SessionError> {
            Err(SessionError::Keyring("no secret service".into()))
        }

        fn remove(&self, _key: &str) -> Result<(), SessionError> {
            Err(SessionError::Keyring("no secret service".into()))
        }

        fn name(&self) -> &'static str {
            "unavailable"
        }
    }

    #[test]
    fn unavailable_primary_falls_back_for_every_operation() {
        let storage = FallbackStorage::new(Unavailable, MemoryStorage::new());

        storage.set("orgdesk.auth_token", "t1").unwrap();
        assert_eq!(storage.get("orgdesk.auth_token").unwrap().as_deref(), Some("t1"));

        storage.remove("orgdesk.auth_token").unwrap();
        assert_eq!(storage.get("orgdesk.auth_token").unwrap(), None);
    }

    #[test]
    fn primary_write_evicts_stale_fallback_copy() {
        let storage = FallbackStorage::new(MemoryStorage::new(), MemoryStorage::new());
        storage.fallback.set("orgdesk.user", "old").unwrap();

        storage.set("orgdesk.user", "new").unwrap();

        assert_eq!(storage.fallback.get("orgdesk.user").unwrap(), None);
        assert_eq!(storage.get("orgdesk.user").unwrap().as_deref(), Some("new"));
    }
}
