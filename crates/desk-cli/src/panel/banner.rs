use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Success,
    Error,
}

/// A status line shown above the card.
///
/// Success banners expire after the panel's TTL. Error banners stay until
/// the next action replaces them.
#[derive(Debug, Clone, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    #[serde(skip)]
    shown_at: Instant,
}

impl Banner {
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(BannerKind::Success, text.into())
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(BannerKind::Error, text.into())
    }

    fn new(kind: BannerKind, text: String) -> Self {
        Self {
            kind,
            text,
            shown_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == BannerKind::Error
    }

    #[must_use]
    pub fn is_expired_at(&self, now: Instant, ttl: Duration) -> bool {
        self.kind == BannerKind::Success && now.saturating_duration_since(self.shown_at) >= ttl
    }
}
