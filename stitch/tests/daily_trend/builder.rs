use stitch::{CacheConfig, MAX_SPAN_DAYS, RetryConfig, SeriesStore, StitchError, Stitcher};

use crate::helpers::*;

fn invalid(result: Result<Stitcher, StitchError>) -> String {
    match result {
        Err(StitchError::InvalidArg(msg)) => msg,
        Err(other) => panic!("expected InvalidArg, got {other:?}"),
        Ok(_) => panic!("expected InvalidArg, got a stitcher"),
    }
}

#[test]
fn fetcher_is_required() {
    let msg = invalid(Stitcher::builder().build());
    assert!(msg.contains("fetcher"), "{msg}");
}

#[test]
fn extension_pad_must_be_positive() {
    let msg = invalid(
        Stitcher::builder()
            .with_fetcher(source())
            .extension_pad_days(0)
            .build(),
    );
    assert!(msg.contains("pad"), "{msg}");
}

#[test]
fn extension_pad_beyond_the_span_limit_is_rejected() {
    let msg = invalid(
        Stitcher::builder()
            .with_fetcher(source())
            .extension_pad_days(MAX_SPAN_DAYS + 1)
            .build(),
    );
    assert!(msg.contains("pad"), "{msg}");
    assert!(
        Stitcher::builder()
            .with_fetcher(source())
            .extension_pad_days(MAX_SPAN_DAYS)
            .build()
            .is_ok()
    );
}

#[test]
fn retry_policy_needs_a_retrieval_attempt() {
    let retry = RetryConfig {
        retrieval_attempts: 0,
        ..RetryConfig::default()
    };
    invalid(Stitcher::builder().with_fetcher(source()).retry(retry).build());
}

#[test]
fn jitter_above_one_hundred_percent_is_rejected() {
    let retry = RetryConfig {
        jitter_percent: 101,
        ..RetryConfig::default()
    };
    invalid(Stitcher::builder().with_fetcher(source()).retry(retry).build());
}

#[test]
fn builder_settings_reach_the_config() {
    let stitcher = Stitcher::builder()
        .with_fetcher(source())
        .extension_pad_days(60)
        .complete_recent_with_hourly(true)
        .cache(CacheConfig::default())
        .build()
        .unwrap();

    let cfg = stitcher.config();
    assert_eq!(cfg.extension_pad_days, 60);
    assert!(cfg.complete_recent_with_hourly);
    assert_eq!(cfg.cache, Some(CacheConfig::default()));
    assert_eq!(stitcher.store().name(), "memory");
}

#[test]
fn invalid_request_geometry_is_rejected() {
    let err = stitch::TrendRequest::builder(KEYWORD, d(2017, 1, 1), d(2017, 6, 1))
        .delta_days(100)
        .overlap_days(100)
        .build()
        .unwrap_err();
    assert!(matches!(err, StitchError::InvalidArg(_)));
}
