//! Re-export of foundational types from `stitch-types`.
// Consolidated re-exports so downstream crates can depend on `stitch-core` only

pub use stitch_types::StitchError;

pub use stitch_types::{CacheConfig, DEFAULT_EXTENSION_PAD_DAYS, RetryConfig, StitchConfig};
pub use stitch_types::{
    DEFAULT_DELTA_DAYS, DEFAULT_OVERLAP_DAYS, MAX_SPAN_DAYS, MAX_TZ_MINUTES, SeriesKey,
    TrendQuery, TrendRequest, TrendRequestBuilder,
};
pub use stitch_types::{Point, RawFrame, RawPoint, TimeSeries, Timeframe, Window};
