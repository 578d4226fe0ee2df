use std::sync::Arc;

use stitch::{Stitcher, Timeframe, is_contiguous_daily};
use stitch_mock::SyntheticTrends;

use crate::helpers::*;

// Daily data published through 2020-12-28; hourly data through 2020-12-31 12:00.
fn lagging() -> Arc<SyntheticTrends> {
    Arc::new(SyntheticTrends::from_fn(d(2019, 1, 1), d(2020, 12, 31), truth).with_lag_days(3))
}

fn with_hourly(src: Arc<SyntheticTrends>, on: bool) -> Stitcher {
    Stitcher::builder()
        .with_fetcher(src)
        .complete_recent_with_hourly(on)
        .build()
        .unwrap()
}

fn asked_for_hourly(log: &[Timeframe]) -> bool {
    log.iter().any(|tf| matches!(tf, Timeframe::Recent7Days))
}

#[tokio::test]
async fn unpublished_days_are_completed_from_hourly_data() {
    let src = lagging();
    let stitcher = with_hourly(src.clone(), true);

    let out = stitcher
        .get_daily_trend(&request(d(2020, 6, 1), d(2020, 12, 31)))
        .await
        .unwrap();

    // 2020-12-31 has only 13 hourly samples and is dropped.
    assert_eq!(last_day(&out), d(2020, 12, 30));
    assert!(is_contiguous_daily(&out));
    assert_tracks_truth(&out, 1e-6);
    assert!(asked_for_hourly(&src.request_log().await));
}

#[tokio::test]
async fn without_completion_the_series_stops_at_the_publishing_lag() {
    let src = lagging();
    let stitcher = with_hourly(src.clone(), false);

    let out = stitcher
        .get_daily_trend(&request(d(2020, 6, 1), d(2020, 12, 31)))
        .await
        .unwrap();

    assert_eq!(last_day(&out), d(2020, 12, 28));
    assert!(!asked_for_hourly(&src.request_log().await));
}

#[tokio::test]
async fn hourly_data_is_not_requested_when_daily_data_reaches_the_end() {
    let src = lagging();
    let stitcher = with_hourly(src.clone(), true);

    let out = stitcher
        .get_daily_trend(&request(d(2020, 6, 1), d(2020, 12, 20)))
        .await
        .unwrap();

    assert_eq!(last_day(&out), d(2020, 12, 20));
    assert!(!asked_for_hourly(&src.request_log().await));
}
