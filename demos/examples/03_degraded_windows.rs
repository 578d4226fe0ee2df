use chrono::TimeDelta;
use stitch::{RetryConfig, StitchError, Stitcher, Timeframe, TrendRequest, Window};
use stitch_demos::common::{date, synthetic};
use stitch_mock::{DynamicMockFetcher, MockBehavior};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Scripted failures only make sense against the synthetic source.
    let (fetcher, ctrl) = DynamicMockFetcher::wrapping("flaky", synthetic());

    let end = date(2018, 10, 4);
    let newest = Window::new(end - TimeDelta::days(269), end)?;
    let broken = newest.shifted_back(2 * 169);
    ctrl.set_timeframe_behavior(
        Timeframe::Window(broken),
        MockBehavior::Fail(StitchError::transient("429 Too Many Requests")),
    )
    .await;

    let retry = RetryConfig {
        retrieval_attempts: 3,
        ..RetryConfig::default()
    };
    let stitcher = Stitcher::builder()
        .with_fetcher(fetcher)
        .retry(retry)
        .build()?;

    let req = TrendRequest::builder("bitcoin", date(2015, 6, 9), end).build()?;
    let series = stitcher.get_daily_trend(&req).await?;
    println!(
        "window {broken} kept failing; series covers {} instead of {} {}",
        series.span_label(),
        req.start(),
        req.end()
    );
    println!("retrieval calls: {}", ctrl.fetch_calls().await.len());
    Ok(())
}
