use chrono::{NaiveDate, TimeDelta};

use stitch_core::{StitchError, TimeSeries, TrendRequest, combine, missing_days};

use crate::core::Stitcher;

impl Stitcher {
    /// Daily series for `req`, restricted to the calendar days `[start, end]`.
    ///
    /// The first call for a key fetches the range and stores the combined
    /// series. Later calls reuse the stored series and fetch only the sides
    /// it does not cover, each padded into the cached range by
    /// `extension_pad_days` so the seam has a real overlap. The stored entry is
    /// rewritten on every call.
    ///
    /// Stored timestamps are shifted by `req.tz()` minutes; the shift is undone
    /// before combining with freshly fetched data.
    ///
    /// # Errors
    /// - `NoData` when nothing is cached and the source returns nothing.
    /// - `DivideByZeroScale` / `DisjointFragments` when a seam cannot be scaled.
    /// - `Store` when the store fails.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "stitch::get_daily_trend",
            skip(self, req),
            fields(
                keyword = %req.query().keyword,
                start = %req.start(),
                end = %req.end(),
                tz = req.tz(),
            ),
        )
    )]
    pub async fn get_daily_trend(&self, req: &TrendRequest) -> Result<TimeSeries, StitchError> {
        let key = req.key().path();
        let tz = req.tz();

        let cached = self.store.lookup(&key).await?.filter(|s| !s.is_empty());
        let combined = match cached {
            None => self.fetch_range(req, req.start(), req.end()).await?,
            Some(series) => self.extend(req, series.shifted_minutes(-tz)?).await?,
        };

        let stored = self.store.insert(&key, combined.shifted_minutes(tz)?).await?;

        let gaps = missing_days(&stored);
        if !gaps.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                key = %key,
                missing = gaps.len(),
                first_missing = %gaps[0],
                "stored series has gaps"
            );
        }

        Ok(stored.slice_days(req.start(), req.end()))
    }

    /// Combine `[left, cached, right]`, fetching only the uncovered sides.
    ///
    /// A side whose data stops short of the cached range is dropped, so a
    /// truncated walk never turns the whole call into `DisjointFragments`.
    async fn extend(
        &self,
        req: &TrendRequest,
        cached: TimeSeries,
    ) -> Result<TimeSeries, StitchError> {
        let (Some(first), Some(last)) = (cached.first_ts(), cached.last_ts()) else {
            return Err(StitchError::no_data("cached series"));
        };
        let (cache_start, cache_end) = (first.date(), last.date());
        let pad_days = self.cfg.extension_pad_days;
        let pad = TimeDelta::try_days(pad_days);
        let out_of_range = || {
            StitchError::InvalidArg(format!(
                "extension pad of {pad_days} days around {cache_start} {cache_end} is out of range"
            ))
        };

        let mut parts = Vec::with_capacity(3);
        if req.start() < cache_start {
            let until = pad
                .and_then(|pad| cache_start.checked_add_signed(pad))
                .ok_or_else(out_of_range)?;
            if let Some(left) = self.extension(req, req.start(), until).await? {
                if left.last_ts().is_some_and(|ts| ts >= first) {
                    parts.push(left);
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        keyword = %req.query().keyword,
                        %cache_start,
                        "left extension stops short of the cached range; skipped"
                    );
                }
            }
        }
        parts.push(cached);
        if req.end() > cache_end {
            let from = pad
                .and_then(|pad| cache_end.checked_sub_signed(pad))
                .ok_or_else(out_of_range)?;
            if let Some(right) = self.extension(req, from, req.end()).await? {
                if right.first_ts().is_some_and(|ts| ts <= last) {
                    parts.push(right);
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        keyword = %req.query().keyword,
                        %cache_end,
                        "right extension stops short of the cached range; skipped"
                    );
                }
            }
        }
        combine(parts)
    }

    /// Fetch one extension side; a side without data leaves the cache as is.
    async fn extension(
        &self,
        req: &TrendRequest,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<TimeSeries>, StitchError> {
        match self.fetch_range(req, start, end).await {
            Ok(series) => Ok(Some(series)),
            Err(StitchError::NoData { .. }) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    keyword = %req.query().keyword,
                    %start,
                    %end,
                    "extension returned no data; keeping cached range"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove the stored series for `req`'s key.
    ///
    /// # Errors
    /// Returns `Store` when the store fails.
    pub async fn forget(&self, req: &TrendRequest) -> Result<(), StitchError> {
        self.store.delete(&req.key().path()).await
    }
}
