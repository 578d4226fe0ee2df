//! Builder for composing fetchers with middleware layers.
//!
//! Layers form an "onion" around the raw fetcher. The `layers` vector is kept
//! in outermost-first order and applied in reverse during `build()`, so the
//! last layer added ends up outermost.

use std::sync::Arc;

use serde_json::json;
use stitch_core::{CacheConfig, Middleware, TrendFetcher};

/// Middleware builder for wrapping a raw fetcher.
pub struct FetcherBuilder {
    raw: Arc<dyn TrendFetcher>,
    layers: Vec<Box<dyn Middleware>>,
}

impl FetcherBuilder {
    /// Start from a raw, unwrapped fetcher.
    #[must_use]
    pub fn new(raw: Arc<dyn TrendFetcher>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Add or replace the window-response cache layer.
    #[must_use]
    pub fn with_cache(mut self, cfg: &CacheConfig) -> Self {
        self.layers.retain(|m| m.name() != "CachingFetcher");
        self.layers
            .insert(0, Box::new(crate::cache::CacheMiddleware::new(*cfg)));
        self
    }

    /// Remove the cache layer if present.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.layers.retain(|m| m.name() != "CachingFetcher");
        self
    }

    /// Add an arbitrary middleware as the outermost layer.
    #[must_use]
    pub fn with_layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Outermost-first description of the stack, ending with the raw fetcher.
    #[must_use]
    pub fn describe(&self) -> Vec<serde_json::Value> {
        self.layers
            .iter()
            .map(|l| json!({ "name": l.name(), "config": l.config_json() }))
            .chain(std::iter::once(
                json!({ "name": "RawFetcher", "config": { "name": self.raw.name() } }),
            ))
            .collect()
    }

    /// Apply every layer, innermost first, and return the outermost fetcher.
    #[must_use]
    pub fn build(self) -> Arc<dyn TrendFetcher> {
        let mut current = self.raw;
        for layer in self.layers.into_iter().rev() {
            current = layer.apply(current);
        }
        current
    }
}
