use std::sync::Arc;

use stitch::{JsonFileStore, SeriesStore, Stitcher, TrendRequest};
use stitch_demos::common::get_fetcher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join("stitch-demos").join("trends.json");
    let store = Arc::new(JsonFileStore::new(&path));
    let stitcher = Stitcher::builder()
        .with_fetcher(get_fetcher())
        .with_store(store.clone())
        .extension_pad_days(60)
        .build()?;

    let req = TrendRequest::builder("rust", "2016-01-01".parse()?, "2016-12-31".parse()?)
        .tz(-300)
        .build()?;
    let series = stitcher.get_daily_trend(&req).await?;
    println!("{} days from {}", series.len(), store.path().display());

    let key = req.key().path();
    if let Some(stored) = store.lookup(&key).await? {
        println!("{key} holds {} ({} days)", stored.label(), stored.len());
    }

    stitcher.forget(&req).await?;
    println!("removed {key}");
    Ok(())
}
