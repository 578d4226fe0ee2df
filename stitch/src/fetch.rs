use chrono::NaiveDate;

use stitch_core::{
    StitchError, TimeSeries, Timeframe, TrendRequest, combine, complete_days_from_hourly,
    generate_fragments,
};
use stitch_middleware::RetryingFetcher;

use crate::core::Stitcher;

impl Stitcher {
    /// Fetch `[start, end]` from the source and combine the fragments, without
    /// touching the store.
    ///
    /// Fragment length, overlap and the retrieval backoff base come from `req`;
    /// its own range is ignored. The result is in source-native time.
    ///
    /// # Errors
    /// - `InvalidArg` for an invalid range or fragment geometry.
    /// - `NoData` if not even the newest window returned data.
    /// - `DivideByZeroScale` / `DisjointFragments` from the combination step.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "stitch::fetch_range",
            skip(self, req),
            fields(keyword = %req.query().keyword, %start, %end),
        )
    )]
    pub async fn fetch_range(
        &self,
        req: &TrendRequest,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, StitchError> {
        let retrying = RetryingFetcher::new(
            self.fetcher.clone(),
            self.cfg.retry.with_sleep_base(req.sleep()),
        );
        let query = req.query();

        let fragments = generate_fragments(
            |window| {
                let retrying = &retrying;
                async move { retrying.fetch(query, &Timeframe::Window(window)).await }
            },
            start,
            end,
            req.delta_days(),
            req.overlap_days(),
        )
        .await?;

        let mut series: Vec<TimeSeries> = fragments.into_iter().map(TimeSeries::from).collect();
        if self.cfg.complete_recent_with_hourly
            && let Some(hourly) = self.recent_days(&retrying, req, &series, end).await?
        {
            series.push(hourly);
        }
        combine(series)
    }

    /// Complete days from the trailing hourly timeframe, if they extend the
    /// newest fragment towards `end` and overlap it.
    async fn recent_days(
        &self,
        retrying: &RetryingFetcher,
        req: &TrendRequest,
        fragments: &[TimeSeries],
        end: NaiveDate,
    ) -> Result<Option<TimeSeries>, StitchError> {
        let Some(newest_ts) = fragments.last().and_then(TimeSeries::last_ts) else {
            return Ok(None);
        };
        if newest_ts.date() >= end {
            return Ok(None);
        }
        let Some(frame) = retrying.fetch(req.query(), &Timeframe::Recent7Days).await? else {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                keyword = %req.query().keyword,
                "no hourly data; recent days left incomplete"
            );
            return Ok(None);
        };
        let daily = complete_days_from_hourly(&frame).slice_days(NaiveDate::MIN, end);
        match (daily.first_ts(), daily.last_ts()) {
            (Some(_), Some(last)) if last <= newest_ts => Ok(None),
            (Some(first), Some(_)) if first <= newest_ts => Ok(Some(daily)),
            _ => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    keyword = %req.query().keyword,
                    newest = %newest_ts,
                    "hourly data does not overlap the newest fragment; skipping completion"
                );
                Ok(None)
            }
        }
    }
}
