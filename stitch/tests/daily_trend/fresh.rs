use stitch::{SeriesStore, is_contiguous_daily};

use crate::helpers::*;

#[tokio::test]
async fn single_window_range_tracks_truth() {
    let src = source();
    let stitcher = stitcher(src.clone());
    let req = request(d(2017, 6, 9), d(2017, 10, 4));

    let out = stitcher.get_daily_trend(&req).await.unwrap();

    assert_eq!(first_day(&out), d(2017, 6, 9));
    assert_eq!(last_day(&out), d(2017, 10, 4));
    assert_eq!(out.len(), 118);
    assert_tracks_truth(&out, 1e-6);

    // The whole window is kept, not just the requested slice.
    let stored = stitcher
        .store()
        .lookup(&req.key().path())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.len(), 270);
    assert_close(stored.max_value().unwrap(), 100.0, 1e-9);
    assert_eq!(src.request_log().await.len(), 1);
}

#[tokio::test]
async fn multi_fragment_range_is_normalized_and_contiguous() {
    let stitcher = stitcher(source());
    let req = request(d(2015, 6, 9), d(2018, 10, 4));

    let out = stitcher.get_daily_trend(&req).await.unwrap();

    assert_eq!(first_day(&out), req.start());
    assert_eq!(last_day(&out), req.end());
    assert!(is_contiguous_daily(&out));
    assert_tracks_truth(&out, 1e-6);

    let stored = stitcher
        .store()
        .lookup(&req.key().path())
        .await
        .unwrap()
        .unwrap();
    assert!(first_day(&stored) <= req.start());
    assert_eq!(last_day(&stored), req.end());
    assert!(is_contiguous_daily(&stored));
    assert_close(stored.max_value().unwrap(), 100.0, 1e-9);
    assert!(stored.points().iter().any(|p| p.blended));
}

#[tokio::test]
async fn empty_store_is_populated_on_first_call() {
    let stitcher = stitcher(source());
    let req = request(d(2016, 3, 1), d(2016, 9, 30));
    let key = req.key().path();

    assert!(stitcher.store().lookup(&key).await.unwrap().is_none());
    stitcher.get_daily_trend(&req).await.unwrap();

    let stored = stitcher.store().lookup(&key).await.unwrap().unwrap();
    assert!(first_day(&stored) <= req.start());
    assert!(last_day(&stored) >= req.end());
}

#[tokio::test]
async fn repeated_call_returns_the_same_series_without_fetching() {
    let src = source();
    let stitcher = stitcher(src.clone());
    let req = request(d(2015, 6, 9), d(2018, 10, 4));

    let first = stitcher.get_daily_trend(&req).await.unwrap();
    src.clear_log().await;
    let second = stitcher.get_daily_trend(&req).await.unwrap();

    assert_eq!(first, second);
    assert!(src.request_log().await.is_empty());
}

#[tokio::test]
async fn rounded_source_stays_close_to_truth() {
    let stitcher = stitcher(quantized_source());
    let req = request(d(2015, 6, 9), d(2018, 10, 4));

    let out = stitcher.get_daily_trend(&req).await.unwrap();

    assert!(is_contiguous_daily(&out));
    assert_tracks_truth(&out, 3.5);
}

#[tokio::test]
async fn timezone_shift_moves_stored_timestamps() {
    let stitcher = stitcher(source());
    let req = request_tz(d(2017, 6, 9), d(2017, 10, 4), 360);

    let out = stitcher.get_daily_trend(&req).await.unwrap();

    assert_eq!(first_day(&out), d(2017, 6, 9));
    assert_eq!(
        out.first_ts().unwrap(),
        midnight(d(2017, 6, 9)) + chrono::TimeDelta::hours(6)
    );
    assert!(req.key().path().contains("/tz360/"));
}
