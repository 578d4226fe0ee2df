//! Daily series, fetch windows and raw fetch frames.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::StitchError;

const DATE_FMT: &str = "%Y-%m-%d";

/// One sample of a [`TimeSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Sample timestamp (timezone-naive).
    pub ts: NaiveDateTime,
    /// Interest value.
    pub value: f64,
    /// True when the value was averaged from more than one overlapping source.
    #[serde(default)]
    pub blended: bool,
}

impl Point {
    /// Build an unblended point.
    #[must_use]
    pub const fn new(ts: NaiveDateTime, value: f64) -> Self {
        Self {
            ts,
            value,
            blended: false,
        }
    }
}

/// Ordered, labelled series of samples with strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    label: String,
    points: Vec<Point>,
}

impl TimeSeries {
    /// Build a series from points that are already strictly increasing.
    ///
    /// # Errors
    /// Returns `InvalidArg` if timestamps are out of order or duplicated.
    pub fn try_new(label: impl Into<String>, points: Vec<Point>) -> Result<Self, StitchError> {
        if let Some(w) = points.windows(2).find(|w| w[0].ts >= w[1].ts) {
            return Err(StitchError::InvalidArg(format!(
                "series timestamps must be strictly increasing ({} then {})",
                w[0].ts, w[1].ts
            )));
        }
        Ok(Self {
            label: label.into(),
            points,
        })
    }

    /// Build a series from `(ts, value)` pairs in any order; the last value wins on duplicates.
    pub fn from_values<I>(label: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDateTime, f64)>,
    {
        let map: BTreeMap<NaiveDateTime, f64> = values.into_iter().collect();
        Self {
            label: label.into(),
            points: map.into_iter().map(|(ts, v)| Point::new(ts, v)).collect(),
        }
    }

    /// Series label (the window range it was fetched for, or the combined span).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Samples in timestamp order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the series has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Timestamp of the first sample.
    #[must_use]
    pub fn first_ts(&self) -> Option<NaiveDateTime> {
        self.points.first().map(|p| p.ts)
    }

    /// Timestamp of the last sample.
    #[must_use]
    pub fn last_ts(&self) -> Option<NaiveDateTime> {
        self.points.last().map(|p| p.ts)
    }

    /// Value at exactly `ts`, if present.
    #[must_use]
    pub fn value_at(&self, ts: NaiveDateTime) -> Option<f64> {
        self.points
            .binary_search_by_key(&ts, |p| p.ts)
            .ok()
            .map(|i| self.points[i].value)
    }

    /// Iterate over values in timestamp order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Largest finite value, if any.
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        max_finite(self.values())
    }

    /// Largest finite value with `from <= ts <= to`.
    #[must_use]
    pub fn max_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> Option<f64> {
        max_finite(
            self.points
                .iter()
                .filter(|p| p.ts >= from && p.ts <= to)
                .map(|p| p.value),
        )
    }

    /// Multiply every value by `coef`.
    #[must_use]
    pub fn scaled(mut self, coef: f64) -> Self {
        for p in &mut self.points {
            p.value *= coef;
        }
        self
    }

    /// Move every timestamp by `minutes` (positive shifts forward).
    ///
    /// # Errors
    /// Returns `InvalidArg` if the shift or a shifted timestamp is outside the
    /// range `chrono` can represent.
    pub fn shifted_minutes(mut self, minutes: i64) -> Result<Self, StitchError> {
        if minutes == 0 {
            return Ok(self);
        }
        let d = TimeDelta::try_minutes(minutes).ok_or_else(|| {
            StitchError::InvalidArg(format!("shift of {minutes} minutes is out of range"))
        })?;
        for p in &mut self.points {
            let ts = p.ts;
            p.ts = ts.checked_add_signed(d).ok_or_else(|| {
                StitchError::InvalidArg(format!("shifting {ts} by {minutes} minutes overflows"))
            })?;
        }
        Ok(self)
    }

    /// Keep the samples that fall on a calendar day in `[start, end]`.
    #[must_use]
    pub fn slice_days(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let points = self
            .points
            .iter()
            .filter(|p| {
                let d = p.ts.date();
                d >= start && d <= end
            })
            .copied()
            .collect();
        Self {
            label: self.label.clone(),
            points,
        }
    }

    /// Label in the form `"first last"` derived from the sample span.
    #[must_use]
    pub fn span_label(&self) -> String {
        match (self.first_ts(), self.last_ts()) {
            (Some(a), Some(b)) => format!(
                "{} {}",
                a.date().format(DATE_FMT),
                b.date().format(DATE_FMT)
            ),
            _ => String::new(),
        }
    }
}

fn max_finite<I: Iterator<Item = f64>>(values: I) -> Option<f64> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
}

/// Inclusive calendar window `[start, end]` requested from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    start: NaiveDate,
    end: NaiveDate,
}

impl Window {
    /// Build a window.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, StitchError> {
        if start > end {
            return Err(StitchError::InvalidArg(format!(
                "window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// First day of the window.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Same-length window moved `days` into the past.
    ///
    /// # Panics
    /// Panics if the moved window is outside the supported date range; see
    /// [`checked_shifted_back`](Self::checked_shifted_back).
    #[must_use]
    pub fn shifted_back(self, days: i64) -> Self {
        let d = TimeDelta::days(days);
        Self {
            start: self.start - d,
            end: self.end - d,
        }
    }

    /// Same-length window moved `days` into the past, or `None` on overflow.
    #[must_use]
    pub fn checked_shifted_back(self, days: i64) -> Option<Self> {
        let d = TimeDelta::try_days(days)?;
        Some(Self {
            start: self.start.checked_sub_signed(d)?,
            end: self.end.checked_sub_signed(d)?,
        })
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.start.format(DATE_FMT),
            self.end.format(DATE_FMT)
        )
    }
}

/// Timeframe understood by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Timeframe {
    /// An absolute daily window.
    Window(Window),
    /// The trailing seven days at hourly resolution (`"now 7-d"`).
    Recent7Days,
}

impl Timeframe {
    /// True for timeframes relative to the current time.
    #[must_use]
    pub const fn is_relative(&self) -> bool {
        matches!(self, Self::Recent7Days)
    }
}

impl From<Window> for Timeframe {
    fn from(w: Window) -> Self {
        Self::Window(w)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Window(w) => w.fmt(f),
            Self::Recent7Days => f.write_str("now 7-d"),
        }
    }
}

/// One row returned by the source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    /// Sample timestamp in source-native time.
    pub ts: NaiveDateTime,
    /// Locally normalized value.
    pub value: f64,
    /// The source marks the period as still accumulating.
    pub is_partial: bool,
}

/// Rows returned by the source for one timeframe.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawFrame {
    /// Rows in the order the source returned them.
    pub points: Vec<RawPoint>,
}

impl RawFrame {
    /// True when the source returned no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drop the partial marker column and label the data with `label`.
    #[must_use]
    pub fn into_series(self, label: impl Into<String>) -> TimeSeries {
        TimeSeries::from_values(label, self.points.into_iter().map(|p| (p.ts, p.value)))
    }
}
