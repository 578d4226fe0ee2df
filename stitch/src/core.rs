use std::sync::Arc;

use stitch_core::{
    CacheConfig, MAX_SPAN_DAYS, MemoryStore, RetryConfig, SeriesStore, StitchConfig, StitchError,
    TrendFetcher,
};
use stitch_middleware::FetcherBuilder;

/// Orchestrator that builds, caches and extends stitched daily series.
pub struct Stitcher {
    pub(crate) fetcher: Arc<dyn TrendFetcher>,
    pub(crate) store: Arc<dyn SeriesStore>,
    pub(crate) cfg: StitchConfig,
}

/// Builder for constructing a `Stitcher` with custom configuration.
pub struct StitcherBuilder {
    fetcher: Option<Arc<dyn TrendFetcher>>,
    store: Option<Arc<dyn SeriesStore>>,
    cfg: StitchConfig,
}

impl Default for StitcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StitcherBuilder {
    /// Create a new builder with default configuration.
    ///
    /// - Starts with no fetcher; you must register one via [`with_fetcher`](Self::with_fetcher).
    /// - Without [`with_store`](Self::with_store) an in-memory store is used.
    /// - Defaults: 100 day extension pad, no hourly completion, no window cache,
    ///   and the default two-layer retry policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fetcher: None,
            store: None,
            cfg: StitchConfig::default(),
        }
    }

    /// Set the data source.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn TrendFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Set the store that keeps combined series between calls.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn SeriesStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: StitchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Days of cached data refetched on each side when extending a series.
    ///
    /// Larger pads give the extension seam a longer overlap at the cost of
    /// fetching more already-known days.
    #[must_use]
    pub const fn extension_pad_days(mut self, days: i64) -> Self {
        self.cfg.extension_pad_days = days;
        self
    }

    /// Fill days not yet published at daily resolution from hourly data.
    #[must_use]
    pub const fn complete_recent_with_hourly(mut self, yes: bool) -> Self {
        self.cfg.complete_recent_with_hourly = yes;
        self
    }

    /// Retry policy applied to every fetched timeframe.
    #[must_use]
    pub const fn retry(mut self, retry: RetryConfig) -> Self {
        self.cfg.retry = retry;
        self
    }

    /// Memoize window responses in process.
    #[must_use]
    pub const fn cache(mut self, cache: CacheConfig) -> Self {
        self.cfg.cache = Some(cache);
        self
    }

    /// Build the `Stitcher`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no fetcher was registered, the extension pad is
    /// outside `1..=MAX_SPAN_DAYS`, or the retry policy allows no retrieval
    /// attempt.
    pub fn build(self) -> Result<Stitcher, StitchError> {
        let Some(raw) = self.fetcher else {
            return Err(StitchError::InvalidArg(
                "no fetcher registered; add one via with_fetcher(...)".to_string(),
            ));
        };
        if !(1..=MAX_SPAN_DAYS).contains(&self.cfg.extension_pad_days) {
            return Err(StitchError::InvalidArg(format!(
                "extension pad must be within [1, {MAX_SPAN_DAYS}] days (got {})",
                self.cfg.extension_pad_days
            )));
        }
        if self.cfg.retry.retrieval_attempts == 0 {
            return Err(StitchError::InvalidArg(
                "retry policy needs at least one retrieval attempt".to_string(),
            ));
        }
        if self.cfg.retry.jitter_percent > 100 {
            return Err(StitchError::InvalidArg(format!(
                "jitter percent must be within [0, 100] (got {})",
                self.cfg.retry.jitter_percent
            )));
        }

        let fetcher = match &self.cfg.cache {
            Some(cache) => FetcherBuilder::new(raw).with_cache(cache).build(),
            None => raw,
        };
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn SeriesStore>);

        Ok(Stitcher {
            fetcher,
            store,
            cfg: self.cfg,
        })
    }
}

impl Stitcher {
    /// Start building a new `Stitcher`.
    ///
    /// ```rust,ignore
    /// let stitcher = stitch::Stitcher::builder()
    ///     .with_fetcher(fetcher)
    ///     .extension_pad_days(60)
    ///     .complete_recent_with_hourly(true)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> StitcherBuilder {
        StitcherBuilder::new()
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &StitchConfig {
        &self.cfg
    }

    /// The store holding combined series.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SeriesStore> {
        &self.store
    }

    /// The (possibly cache-wrapped) fetcher.
    #[must_use]
    pub fn fetcher(&self) -> &Arc<dyn TrendFetcher> {
        &self.fetcher
    }
}
