#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use stitch::{Stitcher, TimeSeries, Timeframe, TrendFetcher, TrendRequest, Window};
use stitch_mock::SyntheticTrends;

// ---------- Fixtures ----------

pub const KEYWORD: &str = "bitcoin";

/// Construct a date from components for readability in tests.
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Seasonal baseline plus a sharp spike on 2017-08-01.
pub fn truth(day: NaiveDate) -> f64 {
    let t = (day - d(2010, 1, 1)).num_days() as f64;
    let spike = (day - d(2017, 8, 1)).num_days() as f64 / 20.0;
    20.0 + 10.0 * (2.0 * std::f64::consts::PI * t / 365.25).sin() + 150.0 * (-spike * spike).exp()
}

/// Source serving `truth` for 2010-01-01..=2020-12-31.
pub fn source() -> Arc<SyntheticTrends> {
    Arc::new(SyntheticTrends::from_fn(d(2010, 1, 1), d(2020, 12, 31), truth))
}

/// Same source with values rounded to integers.
pub fn quantized_source() -> Arc<SyntheticTrends> {
    Arc::new(SyntheticTrends::from_fn(d(2010, 1, 1), d(2020, 12, 31), truth).quantized(true))
}

pub fn stitcher(fetcher: Arc<dyn TrendFetcher>) -> Stitcher {
    Stitcher::builder().with_fetcher(fetcher).build().unwrap()
}

pub fn request(start: NaiveDate, end: NaiveDate) -> TrendRequest {
    TrendRequest::builder(KEYWORD, start, end).build().unwrap()
}

pub fn request_tz(start: NaiveDate, end: NaiveDate, tz: i64) -> TrendRequest {
    TrendRequest::builder(KEYWORD, start, end).tz(tz).build().unwrap()
}

pub fn midnight(day: NaiveDate) -> chrono::NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

// ---------- Assertions ----------

pub fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {b}, got {a} (tol {tol})");
}

fn max_of(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::MIN, f64::max)
}

/// Both sides rescaled to a maximum of 100 over `series`' days, then compared
/// point by point.
pub fn assert_tracks_truth(series: &TimeSeries, tol: f64) {
    assert!(!series.is_empty(), "series is empty");
    let actual_max = series.max_value().unwrap();
    let truth_max = max_of(series.points().iter().map(|p| truth(p.ts.date())));
    for p in series.points() {
        let actual = p.value / actual_max * 100.0;
        let expected = truth(p.ts.date()) / truth_max * 100.0;
        assert!(
            (actual - expected).abs() <= tol,
            "{}: expected {expected}, got {actual} (tol {tol})",
            p.ts
        );
    }
}

/// Same timestamps, and the same values once each side is rescaled to 100.
pub fn assert_same_shape(a: &TimeSeries, b: &TimeSeries, tol: f64) {
    assert_eq!(a.len(), b.len(), "length mismatch");
    let (a_max, b_max) = (a.max_value().unwrap(), b.max_value().unwrap());
    for (pa, pb) in a.points().iter().zip(b.points()) {
        assert_eq!(pa.ts, pb.ts);
        let (va, vb) = (pa.value / a_max * 100.0, pb.value / b_max * 100.0);
        assert!((va - vb).abs() <= tol, "{}: {va} vs {vb} (tol {tol})", pa.ts);
    }
}

pub fn first_day(series: &TimeSeries) -> NaiveDate {
    series.first_ts().unwrap().date()
}

pub fn last_day(series: &TimeSeries) -> NaiveDate {
    series.last_ts().unwrap().date()
}

/// Windows in a request log, in call order.
pub fn windows(log: &[Timeframe]) -> Vec<Window> {
    log.iter()
        .filter_map(|tf| match tf {
            Timeframe::Window(w) => Some(*w),
            _ => None,
        })
        .collect()
}
