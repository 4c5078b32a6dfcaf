//! Organization panel presentation settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_banner_secs() -> u64 {
    3
}

const fn default_per_page() -> u32 {
    15
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PanelConfig {
    /// How long success banners stay visible, in seconds.
    #[serde(default = "default_banner_secs")]
    pub banner_secs: u64,

    /// Default page size for organization listings.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            banner_secs: default_banner_secs(),
            per_page: default_per_page(),
        }
    }
}

impl PanelConfig {
    #[must_use]
    pub const fn banner_ttl(&self) -> Duration {
        Duration::from_secs(self.banner_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = PanelConfig::default();
        assert_eq!(config.banner_ttl(), Duration::from_secs(3));
        assert_eq!(config.per_page, 15);
    }
}
