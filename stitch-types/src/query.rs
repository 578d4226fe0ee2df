//! Request types: what to fetch, over which range, and where it is cached.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::StitchError;

/// Default fragment length in days. The source stops serving daily
/// resolution above roughly 270 days.
pub const DEFAULT_DELTA_DAYS: i64 = 269;
/// Default overlap between adjacent fragments in days.
pub const DEFAULT_OVERLAP_DAYS: i64 = 100;
/// Largest timezone shift accepted, in minutes (one day either way).
pub const MAX_TZ_MINUTES: i64 = 24 * 60;
/// Largest fragment length or extension pad accepted, in days.
pub const MAX_SPAN_DAYS: i64 = 36_525;

/// Source-side query parameters shared by every window of a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrendQuery {
    /// Single search keyword.
    pub keyword: String,
    /// Category id (0 = all categories).
    pub cat: u32,
    /// Region code; empty means worldwide.
    pub geo: String,
    /// Property filter (`""`, `"images"`, `"news"`, `"youtube"`, `"froogle"`); empty means web search.
    pub gprop: String,
}

impl TrendQuery {
    /// Worldwide web-search query for `keyword` in all categories.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            cat: 0,
            geo: String::new(),
            gprop: String::new(),
        }
    }
}

/// Key under which one series is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    /// Query the series answers.
    pub query: TrendQuery,
    /// Timezone shift in minutes applied to stored timestamps.
    pub tz: i64,
}

impl SeriesKey {
    /// Logical store path:
    /// `interest_over_time/c{cat}/{geo|world}/{gprop|web}/tz{tz}/daily/{keyword}`.
    #[must_use]
    pub fn path(&self) -> String {
        let q = &self.query;
        let geo = if q.geo.is_empty() { "world" } else { &q.geo };
        let gprop = if q.gprop.is_empty() { "web" } else { &q.gprop };
        format!(
            "interest_over_time/c{}/{}/{}/tz{}/daily/{}",
            q.cat, geo, gprop, self.tz, q.keyword
        )
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// A request for a consistently scaled daily series over `[start, end]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendRequest {
    query: TrendQuery,
    start: NaiveDate,
    end: NaiveDate,
    delta_days: i64,
    overlap_days: i64,
    sleep: Duration,
    tz: i64,
}

impl TrendRequest {
    /// Start building a request for `keyword` over `[start, end]`.
    pub fn builder(
        keyword: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TrendRequestBuilder {
        TrendRequestBuilder {
            query: TrendQuery::new(keyword),
            start,
            end,
            delta_days: DEFAULT_DELTA_DAYS,
            overlap_days: DEFAULT_OVERLAP_DAYS,
            sleep: Duration::ZERO,
            tz: 0,
        }
    }

    /// Parse `"YYYY-MM-DD"` dates and build a request with default parameters.
    ///
    /// # Errors
    /// Returns `InvalidArg` if either date fails to parse or the range is invalid.
    pub fn parse(keyword: impl Into<String>, start: &str, end: &str) -> Result<Self, StitchError> {
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")?;
        let end = NaiveDate::parse_from_str(end, "%Y-%m-%d")?;
        Self::builder(keyword, start, end).build()
    }

    /// Source query.
    #[must_use]
    pub const fn query(&self) -> &TrendQuery {
        &self.query
    }

    /// First requested day.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last requested day.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Fragment length in days.
    #[must_use]
    pub const fn delta_days(&self) -> i64 {
        self.delta_days
    }

    /// Overlap between adjacent fragments in days.
    #[must_use]
    pub const fn overlap_days(&self) -> i64 {
        self.overlap_days
    }

    /// Base delay of the retrieval backoff.
    #[must_use]
    pub const fn sleep(&self) -> Duration {
        self.sleep
    }

    /// Timezone shift in minutes relative to UTC+0 (e.g. 480 for UTC+8, -360 for UTC-6).
    #[must_use]
    pub const fn tz(&self) -> i64 {
        self.tz
    }

    /// Cache key for this request.
    #[must_use]
    pub fn key(&self) -> SeriesKey {
        SeriesKey {
            query: self.query.clone(),
            tz: self.tz,
        }
    }

    /// Copy of this request covering a different range.
    #[must_use]
    pub fn with_range(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            ..self.clone()
        }
    }
}

/// Builder for [`TrendRequest`].
#[derive(Debug, Clone)]
pub struct TrendRequestBuilder {
    query: TrendQuery,
    start: NaiveDate,
    end: NaiveDate,
    delta_days: i64,
    overlap_days: i64,
    sleep: Duration,
    tz: i64,
}

impl TrendRequestBuilder {
    /// Category id.
    #[must_use]
    pub const fn cat(mut self, cat: u32) -> Self {
        self.query.cat = cat;
        self
    }

    /// Region code (empty for worldwide).
    #[must_use]
    pub fn geo(mut self, geo: impl Into<String>) -> Self {
        self.query.geo = geo.into();
        self
    }

    /// Property filter (empty for web search).
    #[must_use]
    pub fn gprop(mut self, gprop: impl Into<String>) -> Self {
        self.query.gprop = gprop.into();
        self
    }

    /// Fragment length in days.
    #[must_use]
    pub const fn delta_days(mut self, days: i64) -> Self {
        self.delta_days = days;
        self
    }

    /// Overlap between adjacent fragments in days.
    #[must_use]
    pub const fn overlap_days(mut self, days: i64) -> Self {
        self.overlap_days = days;
        self
    }

    /// Base delay of the retrieval backoff (`sleep * 2^attempt`).
    #[must_use]
    pub const fn sleep(mut self, sleep: Duration) -> Self {
        self.sleep = sleep;
        self
    }

    /// Timezone shift in minutes.
    #[must_use]
    pub const fn tz(mut self, minutes: i64) -> Self {
        self.tz = minutes;
        self
    }

    /// Validate and build the request.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the keyword is empty, `start > end`, the
    /// fragment parameters do not satisfy `MAX_SPAN_DAYS >= delta > overlap > 0`,
    /// or `|tz|` exceeds [`MAX_TZ_MINUTES`].
    pub fn build(self) -> Result<TrendRequest, StitchError> {
        if self.query.keyword.trim().is_empty() {
            return Err(StitchError::InvalidArg("keyword must not be empty".into()));
        }
        if self.start > self.end {
            return Err(StitchError::InvalidArg(format!(
                "start {} is after end {}",
                self.start, self.end
            )));
        }
        if self.overlap_days <= 0 || self.delta_days <= self.overlap_days {
            return Err(StitchError::InvalidArg(format!(
                "fragment length {} must exceed overlap {} and overlap must be positive",
                self.delta_days, self.overlap_days
            )));
        }
        if self.delta_days > MAX_SPAN_DAYS {
            return Err(StitchError::InvalidArg(format!(
                "fragment length {} exceeds {MAX_SPAN_DAYS} days",
                self.delta_days
            )));
        }
        if !(-MAX_TZ_MINUTES..=MAX_TZ_MINUTES).contains(&self.tz) {
            return Err(StitchError::InvalidArg(format!(
                "timezone shift {} must be within ±{MAX_TZ_MINUTES} minutes",
                self.tz
            )));
        }
        Ok(TrendRequest {
            query: self.query,
            start: self.start,
            end: self.end,
            delta_days: self.delta_days,
            overlap_days: self.overlap_days,
            sleep: self.sleep,
            tz: self.tz,
        })
    }
}
