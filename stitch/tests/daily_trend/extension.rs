use chrono::TimeDelta;
use stitch::{SeriesStore, is_contiguous_daily};

use crate::helpers::*;

fn pad() -> TimeDelta {
    TimeDelta::days(100)
}

#[tokio::test]
async fn extending_to_a_wider_range_tracks_truth() {
    let stitcher = stitcher(source());
    stitcher
        .get_daily_trend(&request(d(2017, 6, 9), d(2017, 10, 4)))
        .await
        .unwrap();

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
    assert_close(stored.max_value().unwrap(), 100.0, 1e-9);
}

#[tokio::test]
async fn extending_a_rounded_source_stays_close_to_truth() {
    let stitcher = stitcher(quantized_source());
    stitcher
        .get_daily_trend(&request(d(2017, 6, 9), d(2017, 10, 4)))
        .await
        .unwrap();

    let out = stitcher
        .get_daily_trend(&request(d(2015, 6, 9), d(2018, 10, 4)))
        .await
        .unwrap();

    assert_tracks_truth(&out, 3.5);
}

#[tokio::test]
async fn right_extension_fetches_only_the_newer_side() {
    let src = source();
    let stitcher = stitcher(src.clone());
    // Cached span: 2017-01-08..=2017-10-04.
    stitcher
        .get_daily_trend(&request(d(2017, 6, 9), d(2017, 10, 4)))
        .await
        .unwrap();
    src.clear_log().await;

    let req = request(d(2017, 3, 1), d(2017, 12, 31));
    let out = stitcher.get_daily_trend(&req).await.unwrap();

    let fetched = windows(&src.request_log().await);
    assert!(!fetched.is_empty());
    assert_eq!(fetched[0].end(), d(2017, 12, 31));
    assert!(fetched.iter().all(|w| w.end() > d(2017, 10, 4) - pad()));
    assert_eq!(first_day(&out), d(2017, 3, 1));
    assert_eq!(last_day(&out), d(2017, 12, 31));
    assert_tracks_truth(&out, 1e-6);
}

#[tokio::test]
async fn left_extension_fetches_only_the_older_side() {
    let src = source();
    let stitcher = stitcher(src.clone());
    stitcher
        .get_daily_trend(&request(d(2017, 6, 9), d(2017, 10, 4)))
        .await
        .unwrap();
    src.clear_log().await;

    let req = request(d(2016, 6, 1), d(2017, 9, 1));
    let out = stitcher.get_daily_trend(&req).await.unwrap();

    let fetched = windows(&src.request_log().await);
    let padded_end = d(2017, 1, 8) + pad();
    assert_eq!(fetched[0].end(), padded_end);
    assert!(fetched.iter().all(|w| w.end() <= padded_end));
    assert_eq!(first_day(&out), d(2016, 6, 1));
    assert_eq!(last_day(&out), d(2017, 9, 1));
    assert_tracks_truth(&out, 1e-6);
}

#[tokio::test]
async fn range_inside_the_cache_fetches_nothing() {
    let src = source();
    let stitcher = stitcher(src.clone());
    stitcher
        .get_daily_trend(&request(d(2015, 6, 9), d(2018, 10, 4)))
        .await
        .unwrap();
    src.clear_log().await;

    let out = stitcher
        .get_daily_trend(&request(d(2016, 1, 1), d(2016, 12, 31)))
        .await
        .unwrap();

    assert!(src.request_log().await.is_empty());
    assert_eq!(out.len(), 366);
    assert_tracks_truth(&out, 1e-6);
}

async fn incremental_then_full(rounded: bool) {
    let make = || if rounded { quantized_source() } else { source() };
    let incremental = stitcher(make());
    for (start, end) in [
        (d(2017, 6, 9), d(2017, 10, 4)),
        (d(2015, 6, 9), d(2018, 10, 4)),
        (d(2013, 1, 9), d(2013, 10, 4)),
        (d(2020, 6, 9), d(2020, 10, 4)),
    ] {
        incremental
            .get_daily_trend(&request_tz(start, end, 360))
            .await
            .unwrap();
    }
    let full_req = request_tz(d(2012, 6, 9), d(2020, 10, 4), 360);
    let built = incremental.get_daily_trend(&full_req).await.unwrap();

    let fresh = stitcher(make()).get_daily_trend(&full_req).await.unwrap();

    assert!(is_contiguous_daily(&built));
    assert_same_shape(&built, &fresh, if rounded { 3.5 } else { 1e-6 });
}

#[tokio::test]
async fn incremental_build_matches_a_single_fetch() {
    incremental_then_full(false).await;
}

#[tokio::test]
async fn incremental_build_of_a_rounded_source_matches_a_single_fetch() {
    incremental_then_full(true).await;
}

#[tokio::test]
async fn window_cache_serves_refetches_after_forget() {
    let src = source();
    let stitcher = stitch::Stitcher::builder()
        .with_fetcher(src.clone())
        .cache(stitch::CacheConfig::default())
        .build()
        .unwrap();
    let req = request(d(2015, 6, 9), d(2018, 10, 4));

    let first = stitcher.get_daily_trend(&req).await.unwrap();
    stitcher.forget(&req).await.unwrap();
    src.clear_log().await;
    let second = stitcher.get_daily_trend(&req).await.unwrap();

    assert!(src.request_log().await.is_empty());
    assert_same_shape(&first, &second, 1e-9);
}

async fn narrow_then_wide(src: std::sync::Arc<stitch_mock::SyntheticTrends>, tol: f64) {
    let stitcher = stitcher(src);
    let (start, end) = (d(2017, 6, 9), d(2017, 10, 4));
    let narrow = stitcher.get_daily_trend(&request(start, end)).await.unwrap();

    let wide = stitcher
        .get_daily_trend(&request(d(2015, 6, 9), d(2018, 10, 4)))
        .await
        .unwrap()
        .slice_days(start, end);

    // The peak lies inside the narrow range, so both share one scale.
    assert_eq!(narrow.len(), wide.len());
    for (a, b) in narrow.points().iter().zip(wide.points()) {
        assert_eq!(a.ts, b.ts);
        assert_close(b.value, a.value, tol);
    }
}

#[tokio::test]
async fn wider_range_reproduces_the_narrow_result() {
    narrow_then_wide(source(), 1e-6).await;
}

#[tokio::test]
async fn wider_range_of_a_rounded_source_stays_close_to_the_narrow_result() {
    narrow_then_wide(quantized_source(), 3.5).await;
}

#[tokio::test]
async fn negative_timezone_extension_slices_by_shifted_calendar_day() {
    let stitcher = stitcher(source());
    stitcher
        .get_daily_trend(&request_tz(d(2017, 6, 9), d(2017, 10, 4), -360))
        .await
        .unwrap();

    let req = request_tz(d(2015, 6, 9), d(2018, 10, 4), -360);
    let out = stitcher.get_daily_trend(&req).await.unwrap();

    // Day D is stored at D-1 18:00, so the requested days hold D+1 .. end.
    assert_eq!(out.first_ts().unwrap(), midnight(d(2015, 6, 9)) + TimeDelta::hours(18));
    assert_eq!(out.last_ts().unwrap(), midnight(d(2018, 10, 3)) + TimeDelta::hours(18));
    assert!(is_contiguous_daily(&out));
    assert_tracks_truth(&out.clone().shifted_minutes(360).unwrap(), 1e-6);

    let fresh = crate::helpers::stitcher(source())
        .get_daily_trend(&req)
        .await
        .unwrap();
    assert_same_shape(&out, &fresh, 1e-6);
}
