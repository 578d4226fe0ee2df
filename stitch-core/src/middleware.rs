//! Middleware trait for wrapping `TrendFetcher` implementations.

use std::sync::Arc;

use crate::connector::TrendFetcher;

/// Trait implemented by fetcher middleware layers.
///
/// A middleware consumes an inner `TrendFetcher` and returns a wrapped fetcher
/// that augments its behavior (e.g., response caching).
pub trait Middleware: Send + Sync {
    /// Apply this middleware to wrap an inner fetcher and return the wrapped fetcher.
    fn apply(self: Box<Self>, inner: Arc<dyn TrendFetcher>) -> Arc<dyn TrendFetcher>;

    /// Human-readable middleware name for introspection/logging.
    fn name(&self) -> &'static str;

    /// Opaque configuration snapshot for serialization/inspection.
    fn config_json(&self) -> serde_json::Value;
}
