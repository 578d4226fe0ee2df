//! stitch-core
//!
//! Core types, traits, and algorithms shared across the stitch ecosystem.
//!
//! - `types`: re-exports of the request, series, configuration and error types.
//! - `connector`: the `TrendFetcher` trait implemented by data sources.
//! - `store`: the `SeriesStore` trait plus in-memory and JSON-file stores.
//! - `timeseries`: fragment generation, overlap rescaling and related helpers.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Fetchers and stores are async traits; the provided stores use
//! `tokio::sync` locks and `tokio::fs`, so they must run under a Tokio 1.x
//! runtime. The stitching algorithms themselves are synchronous pure functions.
#![warn(missing_docs)]

/// The `TrendFetcher` interface and its payload/outcome types.
pub mod connector;
/// Middleware trait implemented by fetcher wrappers.
pub mod middleware;
/// Persistent and in-memory series stores.
pub mod store;
/// Fragment generation, combination and series diagnostics.
pub mod timeseries;
pub mod types;

pub use connector::{FetchOutcome, Payload, TrendFetcher};
pub use middleware::Middleware;
pub use store::{JsonFileStore, MemoryStore, SeriesStore};
pub use timeseries::combine::{combine, scale_coefficient};
pub use timeseries::fragment::{Fragment, generate_fragments};
pub use timeseries::hourly::complete_days_from_hourly;
pub use timeseries::infer::{is_contiguous_daily, missing_days};
pub use types::*;
