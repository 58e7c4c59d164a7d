//! # Mirror Configuration

use std::time::Duration;

/// Remote mirror configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Backend base URL; `None` disables mirroring.
    pub base_url: Option<String>,

    /// Whole-request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_ms: 5_000,
            connect_timeout_ms: 2_000,
        }
    }
}

impl MirrorConfig {
    /// Create a config for testing (short deadlines).
    pub fn for_testing() -> Self {
        Self {
            base_url: None,
            request_timeout_ms: 300,
            connect_timeout_ms: 300,
        }
    }

    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Connect timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
