use stitch::{Stitcher, TrendRequest};
use stitch_demos::common::get_fetcher;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,stitch=debug,stitch_core=debug,stitch_middleware=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let stitcher = Stitcher::builder().with_fetcher(get_fetcher()).build()?;

    // Three fragments, so the combine step logs two seams.
    let req = TrendRequest::parse("bitcoin", "2016-06-01", "2017-10-04")?;
    let _ = stitcher.get_daily_trend(&req).await?;

    Ok(())
}
