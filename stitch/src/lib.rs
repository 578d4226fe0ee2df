//! Stitch rebuilds long daily interest series from a source that only serves
//! short, locally normalized windows.
//!
//! Overview
//! - Splits a date range into overlapping windows and fetches them newest
//!   first through a [`TrendFetcher`].
//! - Rescales every window onto its neighbour's scale using the overlap,
//!   averages the overlaps and normalizes the result to a maximum of 100.
//! - Persists each combined series in a [`SeriesStore`] and extends it on
//!   later calls, fetching only the uncovered sides.
//! - Optionally completes the days the daily endpoint has not published yet
//!   from the trailing hourly timeframe.
//!
//! Key behaviors and trade-offs
//! - Fetches are sequential: each seam depends on the previous fragment.
//! - Failed windows degrade to missing windows; the call returns whatever
//!   contiguous range succeeded. Zero or disjoint overlaps are fatal.
//! - Cached results are reused as a single column when extending, so a range
//!   built incrementally can differ slightly from a single full fetch.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use stitch::{Stitcher, TrendRequest, JsonFileStore};
//! use stitch_gtrends::GtrendsConnector;
//!
//! let stitcher = Stitcher::builder()
//!     .with_fetcher(Arc::new(GtrendsConnector::new_default()?))
//!     .with_store(Arc::new(JsonFileStore::new("trends-cache.json")))
//!     .build()?;
//!
//! let req = TrendRequest::parse("bitcoin", "2017-06-09", "2017-10-04")?;
//! let series = stitcher.get_daily_trend(&req).await?;
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod extend;
mod fetch;

pub use core::{Stitcher, StitcherBuilder};

pub use stitch_middleware::{CacheMiddleware, CachingFetcher, FetcherBuilder, RetryingFetcher};

// Re-export core types for convenience
pub use stitch_core::{
    CacheConfig, DEFAULT_DELTA_DAYS, DEFAULT_EXTENSION_PAD_DAYS, DEFAULT_OVERLAP_DAYS,
    FetchOutcome, Fragment, JsonFileStore, MAX_SPAN_DAYS, MAX_TZ_MINUTES, MemoryStore,
    Middleware, Payload, Point, RawFrame,
    RawPoint, RetryConfig, SeriesKey, SeriesStore, StitchConfig, StitchError, TimeSeries,
    Timeframe, TrendFetcher, TrendQuery, TrendRequest, TrendRequestBuilder, Window, combine,
    complete_days_from_hourly, generate_fragments, is_contiguous_daily, missing_days,
    scale_coefficient,
};
