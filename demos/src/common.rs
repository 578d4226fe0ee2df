use std::f64::consts::PI;
use std::sync::Arc;

use chrono::NaiveDate;
use stitch::TrendFetcher;
use stitch_gtrends::{GtrendsConfig, GtrendsConnector};
use stitch_mock::SyntheticTrends;

/// Environment variable that switches every demo to the synthetic source.
pub const USE_MOCK_ENV: &str = "STITCH_DEMOS_USE_MOCK";

/// True when demos should stay offline.
#[must_use]
pub fn using_mock() -> bool {
    std::env::var(USE_MOCK_ENV).is_ok()
}

/// Synthetic history: a yearly cycle with a spike in August 2017.
#[must_use]
pub fn synthetic() -> Arc<SyntheticTrends> {
    let (first, last) = (date(2010, 1, 1), date(2020, 12, 31));
    Arc::new(
        SyntheticTrends::from_fn(first, last, move |day| {
            let t = (day - first).num_days() as f64;
            let spike = (day - date(2017, 8, 1)).num_days() as f64 / 20.0;
            20.0 + 10.0 * (2.0 * PI * t / 365.25).sin() + 150.0 * (-spike * spike).exp()
        })
        .quantized(true),
    )
}

/// Return a fetcher for demos.
///
/// # Panics
/// Panics if the HTTP client cannot be constructed.
#[must_use]
pub fn get_fetcher() -> Arc<dyn TrendFetcher> {
    if using_mock() {
        println!("--- (Using synthetic source for CI) ---");
        synthetic()
    } else {
        GtrendsConnector::cached(GtrendsConfig::default())
            .expect("http client construction failed")
            .build()
    }
}

/// Construct a date from components.
///
/// # Panics
/// Panics on an invalid calendar date.
#[must_use]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
