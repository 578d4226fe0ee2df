use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use tokio::sync::Mutex;

use stitch_core::{
    FetchOutcome, Payload, RawFrame, RawPoint, StitchError, Timeframe, TrendFetcher, TrendQuery,
    Window,
};

/// Deterministic source backed by a daily truth series.
///
/// A window request returns the truth inside the window divided by its local
/// maximum and multiplied by 100, like the real source. Daily data is only
/// published up to `today - lag_days`. The trailing seven-day timeframe
/// returns hourly samples (`truth / 24` per hour) for the 168 hours ending at
/// `today` 12:00, normalized the same way.
///
/// Every `build_payload` call is recorded in a request log.
pub struct SyntheticTrends {
    truth: BTreeMap<NaiveDate, f64>,
    today: NaiveDate,
    lag_days: i64,
    quantize: bool,
    log: Mutex<Vec<Timeframe>>,
}

impl SyntheticTrends {
    /// Source serving the given daily values. `today` defaults to the last day.
    pub fn new(truth: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let truth: BTreeMap<NaiveDate, f64> = truth.into_iter().collect();
        let today = truth
            .keys()
            .next_back()
            .copied()
            .unwrap_or(NaiveDate::MIN);
        Self {
            truth,
            today,
            lag_days: 0,
            quantize: false,
            log: Mutex::new(Vec::new()),
        }
    }

    /// Source whose truth is `f(day)` for every day in `[start, end]`.
    pub fn from_fn(start: NaiveDate, end: NaiveDate, f: impl Fn(NaiveDate) -> f64) -> Self {
        Self::new(start.iter_days().take_while(|d| *d <= end).map(|d| (d, f(d))))
    }

    /// Set the current day, which anchors the publishing lag and hourly data.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Days the daily endpoint trails `today` by.
    #[must_use]
    pub const fn with_lag_days(mut self, days: i64) -> Self {
        self.lag_days = days;
        self
    }

    /// Round reported values to integers like the real source.
    #[must_use]
    pub const fn quantized(mut self, on: bool) -> Self {
        self.quantize = on;
        self
    }

    /// Truth value for `day`.
    #[must_use]
    pub fn truth(&self, day: NaiveDate) -> Option<f64> {
        self.truth.get(&day).copied()
    }

    /// Every timeframe requested so far, in call order.
    pub async fn request_log(&self) -> Vec<Timeframe> {
        self.log.lock().await.clone()
    }

    /// Forget recorded requests.
    pub async fn clear_log(&self) {
        self.log.lock().await.clear();
    }

    fn published_through(&self) -> NaiveDate {
        self.today - TimeDelta::days(self.lag_days)
    }

    fn normalize(&self, rows: Vec<(NaiveDateTime, f64)>, partial_from: NaiveDateTime) -> RawFrame {
        let max = rows.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
        let points = rows
            .into_iter()
            .map(|(ts, v)| {
                let mut value = if max > 0.0 { v / max * 100.0 } else { 0.0 };
                if self.quantize {
                    value = value.round();
                }
                RawPoint {
                    ts,
                    value,
                    is_partial: ts >= partial_from,
                }
            })
            .collect();
        RawFrame { points }
    }

    fn window_frame(&self, window: Window) -> RawFrame {
        let last = window.end().min(self.published_through());
        let rows: Vec<(NaiveDateTime, f64)> = self
            .truth
            .range(window.start()..=last.max(window.start()))
            .filter(|(d, _)| **d <= last)
            .map(|(d, v)| (d.and_time(NaiveTime::MIN), *v))
            .collect();
        let partial_from = self.today.and_time(NaiveTime::MIN);
        self.normalize(rows, partial_from)
    }

    fn recent_frame(&self) -> RawFrame {
        let now = self.today.and_time(NaiveTime::MIN) + TimeDelta::hours(12);
        let rows: Vec<(NaiveDateTime, f64)> = (0..168)
            .rev()
            .filter_map(|back| {
                let ts = now - TimeDelta::hours(back);
                self.truth(ts.date()).map(|v| (ts, v / 24.0))
            })
            .collect();
        self.normalize(rows, now)
    }
}

#[async_trait]
impl TrendFetcher for SyntheticTrends {
    fn name(&self) -> &'static str {
        "stitch-mock"
    }

    fn vendor(&self) -> &'static str {
        "Synthetic"
    }

    async fn build_payload(
        &self,
        query: &TrendQuery,
        timeframe: &Timeframe,
    ) -> Result<Payload, StitchError> {
        self.log.lock().await.push(*timeframe);
        Ok(Payload::new(query.clone(), *timeframe))
    }

    async fn interest_over_time(&self, payload: &Payload) -> Result<FetchOutcome, StitchError> {
        let frame = match payload.timeframe {
            Timeframe::Window(w) => self.window_frame(w),
            Timeframe::Recent7Days => self.recent_frame(),
            _ => return Err(StitchError::unsupported("timeframe")),
        };
        if frame.is_empty() {
            Ok(FetchOutcome::NoData)
        } else {
            Ok(FetchOutcome::Data(frame))
        }
    }
}
