//! Stitch-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod query;
mod series;

pub use config::{CacheConfig, DEFAULT_EXTENSION_PAD_DAYS, RetryConfig, StitchConfig};
pub use error::StitchError;
pub use query::{
    DEFAULT_DELTA_DAYS, DEFAULT_OVERLAP_DAYS, MAX_SPAN_DAYS, MAX_TZ_MINUTES, SeriesKey,
    TrendQuery, TrendRequest, TrendRequestBuilder,
};
pub use series::{Point, RawFrame, RawPoint, TimeSeries, Timeframe, Window};
