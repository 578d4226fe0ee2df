use chrono::{NaiveDate, TimeDelta};

use stitch_types::TimeSeries;

/// Calendar days missing between the first and last sample of `series`.
///
/// Samples are bucketed by calendar day, so a constant timezone shift does
/// not introduce gaps. Returns an empty vector for series with fewer than two
/// samples.
#[must_use]
pub fn missing_days(series: &TimeSeries) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut prev: Option<NaiveDate> = None;
    for p in series.points() {
        let d = p.ts.date();
        if let Some(last) = prev {
            let mut cur = last + TimeDelta::days(1);
            while cur < d {
                out.push(cur);
                cur += TimeDelta::days(1);
            }
        }
        prev = Some(d);
    }
    out
}

/// True when `series` holds exactly one sample per calendar day with no gaps.
#[must_use]
pub fn is_contiguous_daily(series: &TimeSeries) -> bool {
    series
        .points()
        .windows(2)
        .all(|w| w[1].ts.date() == w[0].ts.date() + TimeDelta::days(1))
}
