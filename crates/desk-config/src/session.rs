//! Session persistence settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the session (tokens + cached user) is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// OS keychain, falling back to the session file when unavailable.
    #[default]
    Keyring,
    /// JSON file only.
    File,
    /// In-process only; nothing survives the process.
    Memory,
}

fn default_keyring_service() -> String {
    "orgdesk".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Session file path. Empty means `~/.orgdesk/session.json`.
    #[serde(default)]
    pub path: String,

    /// Keychain service name the session entries are stored under.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: String::new(),
            keyring_service: default_keyring_service(),
        }
    }
}

impl SessionConfig {
    /// The session file path, or `None` when no home directory exists.
    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        if !self.path.trim().is_empty() {
            return Some(PathBuf::from(self.path.trim()));
        }
        dirs::home_dir().map(|home| home.join(".orgdesk").join("session.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = SessionConfig::default();
        assert_eq!(config.backend, StorageBackend::Keyring);
        assert_eq!(config.keyring_service, "orgdesk");
        assert!(config.path.is_empty());
    }

    #[test]
    fn explicit_path_wins() {
        let config = SessionConfig {
            path: "/tmp/orgdesk-session.json".into(),
            ..Default::default()
        };
        assert_eq!(
            config.file_path(),
            Some(PathBuf::from("/tmp/orgdesk-session.json"))
        );
    }
}
