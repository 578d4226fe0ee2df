//! Configuration types shared across the orchestrator, middleware and fetchers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Days of already-cached data refetched on each side of a range extension so
/// the new piece and the cached series share a real overlap.
pub const DEFAULT_EXTENSION_PAD_DAYS: i64 = 100;

/// Two-layer retry policy for fetching one timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries of payload construction after the first attempt.
    pub request_retries: u32,
    /// Constant part of the payload-construction backoff.
    pub request_backoff_base: Duration,
    /// Per-attempt increment of the payload-construction backoff.
    pub request_backoff_step: Duration,
    /// Total data-retrieval attempts.
    pub retrieval_attempts: u32,
    /// Base of the exponential retrieval backoff (`base * 2^attempt`).
    ///
    /// Requests carry their own value which replaces this one.
    pub retrieval_sleep_base: Duration,
    /// Random jitter percentage [0, 100] added to each wait.
    pub jitter_percent: u8,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            request_retries: 3,
            request_backoff_base: Duration::from_secs(60),
            request_backoff_step: Duration::from_secs(5),
            retrieval_attempts: 10,
            retrieval_sleep_base: Duration::ZERO,
            jitter_percent: 0,
        }
    }
}

impl RetryConfig {
    /// Wait before payload-construction retry number `attempt` (0-based).
    #[must_use]
    pub fn request_backoff(&self, attempt: u32) -> Duration {
        self.request_backoff_base + self.request_backoff_step.saturating_mul(attempt)
    }

    /// Wait before retrieval attempt number `attempt` (0-based).
    #[must_use]
    pub fn retrieval_backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.retrieval_sleep_base.saturating_mul(factor)
    }

    /// Copy with a different retrieval backoff base.
    #[must_use]
    pub const fn with_sleep_base(mut self, base: Duration) -> Self {
        self.retrieval_sleep_base = base;
        self
    }
}

/// Bounded in-process cache of successful window responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached window responses.
    pub max_entries: u64,
    /// Time-to-live of a cached response.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            ttl: Duration::from_secs(15 * 60),
        }
    }
}

/// Global configuration for the `Stitcher` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StitchConfig {
    /// Days refetched on each side when extending a cached series.
    pub extension_pad_days: i64,
    /// Fill the days the daily endpoint has not published yet from hourly data.
    pub complete_recent_with_hourly: bool,
    /// Retry policy for every fetched timeframe.
    pub retry: RetryConfig,
    /// Memoize window responses in process. `None` disables the cache layer.
    #[serde(default)]
    pub cache: Option<CacheConfig>,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            extension_pad_days: DEFAULT_EXTENSION_PAD_DAYS,
            complete_recent_with_hourly: false,
            retry: RetryConfig::default(),
            cache: None,
        }
    }
}
