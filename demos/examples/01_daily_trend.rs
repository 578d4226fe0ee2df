use stitch::{Stitcher, TrendRequest, is_contiguous_daily};
use stitch_demos::common::get_fetcher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let stitcher = Stitcher::builder().with_fetcher(get_fetcher()).build()?;

    let narrow = TrendRequest::parse("bitcoin", "2017-06-09", "2017-10-04")?;
    let first = stitcher.get_daily_trend(&narrow).await?;
    println!("{}: {} days", first.label(), first.len());

    // Only the uncovered sides are fetched; the cached span is reused.
    let wide = narrow.with_range(
        "2015-06-09".parse()?,
        "2018-10-04".parse()?,
    );
    let series = stitcher.get_daily_trend(&wide).await?;
    println!(
        "{}: {} days, contiguous: {}",
        series.label(),
        series.len(),
        is_contiguous_daily(&series)
    );

    let again = series.slice_days(narrow.start(), narrow.end());
    let drift = first
        .points()
        .iter()
        .zip(again.points())
        .map(|(a, b)| (a.value - b.value).abs())
        .fold(0.0_f64, f64::max);
    println!("largest drift on the narrow range after extending: {drift:.3}");

    if let Some(peak) = series.points().iter().max_by(|a, b| a.value.total_cmp(&b.value)) {
        println!("peak {} on {}", peak.value, peak.ts.date());
    }
    Ok(())
}
