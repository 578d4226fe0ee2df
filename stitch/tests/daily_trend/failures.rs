use std::sync::Arc;

use chrono::{Datelike, TimeDelta};
use stitch::{FetchOutcome, SeriesStore, StitchError, Timeframe, Window};
use stitch_mock::{DynamicMockFetcher, MockBehavior, SyntheticTrends};

use crate::helpers::*;

#[tokio::test]
async fn all_zero_overlap_is_a_divide_by_zero() {
    let src = Arc::new(SyntheticTrends::from_fn(
        d(2010, 1, 1),
        d(2020, 12, 31),
        |day| if day.year() == 2016 { 0.0 } else { truth(day) },
    ));
    let stitcher = stitcher(src);
    let req = request(d(2016, 1, 1), d(2017, 10, 4));

    let err = stitcher.get_daily_trend(&req).await.unwrap_err();

    assert!(matches!(err, StitchError::DivideByZeroScale { .. }), "{err:?}");
    assert!(err.is_fatal());
    assert!(
        stitcher
            .store()
            .lookup(&req.key().path())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn gap_between_fragments_is_reported_as_disjoint() {
    let gap = d(2016, 7, 1)..=d(2016, 11, 30);
    let src = Arc::new(SyntheticTrends::new(
        d(2010, 1, 1)
            .iter_days()
            .take_while(|day| *day <= d(2020, 12, 31))
            .filter(|day| !gap.contains(day))
            .map(|day| (day, truth(day))),
    ));
    let stitcher = stitcher(src);

    let err = stitcher
        .get_daily_trend(&request(d(2016, 1, 1), d(2017, 10, 4)))
        .await
        .unwrap_err();

    assert!(matches!(err, StitchError::DisjointFragments { .. }), "{err:?}");
}

#[tokio::test]
async fn fresh_range_without_data_is_no_data() {
    let src = Arc::new(SyntheticTrends::from_fn(d(2010, 1, 1), d(2012, 12, 31), truth));
    let stitcher = stitcher(src);
    let req = request(d(2019, 1, 1), d(2019, 6, 1));

    let err = stitcher.get_daily_trend(&req).await.unwrap_err();

    assert!(err.is_no_data(), "{err:?}");
    assert!(
        stitcher
            .store()
            .lookup(&req.key().path())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn extension_without_data_keeps_the_cached_range() {
    let src = Arc::new(SyntheticTrends::from_fn(d(2011, 1, 1), d(2013, 6, 30), truth));
    let stitcher = stitcher(src);
    let cached = stitcher
        .get_daily_trend(&request(d(2012, 6, 1), d(2012, 12, 31)))
        .await
        .unwrap();

    let out = stitcher
        .get_daily_trend(&request(d(2012, 6, 1), d(2015, 12, 31)))
        .await
        .unwrap();

    assert_eq!(out, cached);
}

#[tokio::test]
async fn failing_window_truncates_the_series_after_retries() {
    let end = d(2018, 10, 4);
    let newest = Window::new(end - TimeDelta::days(269), end).unwrap();
    let broken = newest.shifted_back(2 * 169);
    let (fetcher, ctrl) = DynamicMockFetcher::wrapping("flaky", source());
    ctrl.set_timeframe_behavior(
        Timeframe::Window(broken),
        MockBehavior::Fail(StitchError::transient("503 Service Unavailable")),
    )
    .await;
    let stitcher = stitcher(fetcher);

    let out = stitcher
        .get_daily_trend(&request(d(2015, 6, 9), end))
        .await
        .unwrap();

    // Only the two newest windows made it.
    assert_eq!(first_day(&out), newest.shifted_back(169).start());
    assert_eq!(first_day(&out), d(2017, 7, 23));
    assert_eq!(last_day(&out), end);
    assert_tracks_truth(&out, 1e-6);

    let calls = ctrl.fetch_calls().await;
    let broken_calls = calls
        .iter()
        .filter(|tf| **tf == Timeframe::Window(broken))
        .count();
    assert_eq!(broken_calls, 10);
    assert_eq!(calls.len(), 12);
}

#[tokio::test]
async fn structural_failure_ends_the_walk_without_retries() {
    let end = d(2018, 10, 4);
    let newest = Window::new(end - TimeDelta::days(269), end).unwrap();
    let broken = newest.shifted_back(169);
    let (fetcher, ctrl) = DynamicMockFetcher::wrapping("short-rows", source());
    ctrl.set_timeframe_behavior(
        Timeframe::Window(broken),
        MockBehavior::Fail(StitchError::structural("row without value")),
    )
    .await;
    let stitcher = stitcher(fetcher);

    let out = stitcher
        .get_daily_trend(&request(d(2015, 6, 9), end))
        .await
        .unwrap();

    assert_eq!(first_day(&out), newest.start());
    assert_eq!(ctrl.fetch_calls().await.len(), 2);
}

#[tokio::test]
async fn right_extension_that_stops_short_of_the_cache_is_skipped() {
    let (fetcher, ctrl) = DynamicMockFetcher::wrapping("flaky", source());
    let stitcher = stitcher(fetcher);
    let cached = stitcher
        .get_daily_trend(&request(d(2017, 6, 9), d(2017, 10, 4)))
        .await
        .unwrap();

    let end = d(2019, 1, 1);
    let newest = Window::new(end - TimeDelta::days(269), end).unwrap();
    ctrl.set_timeframe_behavior(
        Timeframe::Window(newest.shifted_back(169)),
        MockBehavior::Fail(StitchError::structural("row without value")),
    )
    .await;
    let req = request(d(2017, 6, 9), end);

    let out = stitcher.get_daily_trend(&req).await.unwrap();

    assert_eq!(out, cached);
    let stored = stitcher
        .store()
        .lookup(&req.key().path())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first_day(&stored), d(2017, 1, 8));
    assert_eq!(last_day(&stored), d(2017, 10, 4));
}

#[tokio::test]
async fn empty_response_is_treated_as_the_end_of_history() {
    let end = d(2018, 10, 4);
    let newest = Window::new(end - TimeDelta::days(269), end).unwrap();
    let (fetcher, ctrl) = DynamicMockFetcher::wrapping("sparse", source());
    ctrl.set_timeframe_behavior(
        Timeframe::Window(newest.shifted_back(169)),
        MockBehavior::Return(FetchOutcome::NoData),
    )
    .await;
    let stitcher = stitcher(fetcher);

    let out = stitcher
        .get_daily_trend(&request(d(2015, 6, 9), end))
        .await
        .unwrap();

    assert_eq!(first_day(&out), newest.start());
}
