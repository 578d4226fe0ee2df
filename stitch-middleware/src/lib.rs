//! stitch-middleware
//!
//! Wrappers around [`TrendFetcher`](stitch_core::TrendFetcher) implementations:
//!
//! - [`RetryingFetcher`]: the two-layer retry policy that turns a fetcher's
//!   typed failures into "data" or "no data for this window".
//! - [`CachingFetcher`] / [`CacheMiddleware`]: in-process memoization of
//!   window responses.
//! - [`FetcherBuilder`]: composes middleware layers around a raw fetcher.

mod backoff;
mod builder;
mod cache;
mod retry;

pub use crate::builder::FetcherBuilder;
pub use crate::cache::{CacheMiddleware, CachingFetcher};
pub use crate::retry::RetryingFetcher;
