use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default site root of the trends service.
pub const DEFAULT_BASE_URL: &str = "https://trends.google.com";

/// Connection settings for [`GtrendsConnector`](crate::GtrendsConnector).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GtrendsConfig {
    /// Site root; endpoints are resolved against it.
    pub base_url: String,
    /// Interface language sent as `hl`.
    pub hl: String,
    /// Timezone offset in minutes sent as `tz`.
    pub tz: i64,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Overrides the default browser-like user agent.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for GtrendsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            hl: "en-US".to_string(),
            tz: 0,
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

impl GtrendsConfig {
    /// Same settings against another site root (e.g. a local mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
