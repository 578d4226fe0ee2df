use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use stitch_core::{
    CacheConfig, FetchOutcome, Payload, RawFrame, StitchError, Timeframe, TrendFetcher,
    TrendQuery, Window,
};

/// Identity of one cacheable response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WindowKey {
    query: TrendQuery,
    window: Window,
}

impl WindowKey {
    /// Only absolute windows are cacheable; relative timeframes move with the clock.
    fn for_timeframe(query: &TrendQuery, timeframe: &Timeframe) -> Option<Self> {
        match timeframe {
            Timeframe::Window(window) => Some(Self {
                query: query.clone(),
                window: *window,
            }),
            _ => None,
        }
    }
}

/// Marker placed in payloads that were answered from the cache.
const CACHE_HIT: &str = "cache-hit";

fn is_cache_hit(payload: &Payload) -> bool {
    payload
        .request
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .is_some_and(|s| s == CACHE_HIT)
}

/// Fetcher wrapper that memoizes successful window responses.
///
/// When a window is cached, `build_payload` does not reach the inner fetcher
/// and `interest_over_time` answers from memory. "No data" outcomes and
/// errors are never cached.
pub struct CachingFetcher {
    inner: Arc<dyn TrendFetcher>,
    cache: Cache<WindowKey, Arc<RawFrame>>,
}

impl CachingFetcher {
    /// Wrap `inner` with a cache bounded by `cfg`.
    #[must_use]
    pub fn new(inner: Arc<dyn TrendFetcher>, cfg: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(cfg.max_entries.max(1))
            .time_to_live(cfg.ttl)
            .build();
        Self { inner, cache }
    }
}

#[async_trait]
impl TrendFetcher for CachingFetcher {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn vendor(&self) -> &'static str {
        self.inner.vendor()
    }

    fn supports_timeframe(&self, timeframe: &Timeframe) -> bool {
        self.inner.supports_timeframe(timeframe)
    }

    async fn build_payload(
        &self,
        query: &TrendQuery,
        timeframe: &Timeframe,
    ) -> Result<Payload, StitchError> {
        if let Some(key) = WindowKey::for_timeframe(query, timeframe)
            && self.cache.contains_key(&key)
        {
            let mut payload = Payload::new(query.clone(), *timeframe);
            payload.request = Some(serde_json::Value::from(CACHE_HIT));
            return Ok(payload);
        }
        self.inner.build_payload(query, timeframe).await
    }

    async fn interest_over_time(&self, payload: &Payload) -> Result<FetchOutcome, StitchError> {
        let key = WindowKey::for_timeframe(&payload.query, &payload.timeframe);
        if let Some(key) = &key
            && let Some(hit) = self.cache.get(key).await
        {
            #[cfg(feature = "tracing")]
            tracing::debug!(timeframe = %payload.timeframe, "window cache hit");
            return Ok(FetchOutcome::Data(hit.as_ref().clone()));
        }

        // Evicted between the two calls: rebuild against the real source.
        let outcome = if is_cache_hit(payload) {
            let fresh = self
                .inner
                .build_payload(&payload.query, &payload.timeframe)
                .await?;
            self.inner.interest_over_time(&fresh).await?
        } else {
            self.inner.interest_over_time(payload).await?
        };

        if let (Some(key), FetchOutcome::Data(frame)) = (key, &outcome)
            && !frame.is_empty()
        {
            self.cache.insert(key, Arc::new(frame.clone())).await;
        }
        Ok(outcome)
    }
}

/// Declarative wrapper that applies caching when building a fetcher stack.
pub struct CacheMiddleware {
    cfg: CacheConfig,
}

impl CacheMiddleware {
    /// Middleware configured by `cfg`.
    #[must_use]
    pub const fn new(cfg: CacheConfig) -> Self {
        Self { cfg }
    }
}

impl stitch_core::Middleware for CacheMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn TrendFetcher>) -> Arc<dyn TrendFetcher> {
        let Self { cfg } = *self;
        Arc::new(CachingFetcher::new(inner, &cfg))
    }

    fn name(&self) -> &'static str {
        "CachingFetcher"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "max_entries": self.cfg.max_entries,
            "ttl_ms": u64::try_from(self.cfg.ttl.as_millis()).unwrap_or(u64::MAX),
        })
    }
}
