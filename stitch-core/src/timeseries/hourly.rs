use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};

use stitch_types::{RawFrame, TimeSeries};

/// Number of hourly samples a day needs to count as complete.
pub const HOURS_PER_DAY: usize = 24;

/// Sum hourly samples per calendar day, keeping only complete days.
///
/// Days with fewer than [`HOURS_PER_DAY`] samples, typically the first and
/// last day of a trailing seven-day window, are dropped. Each kept day is
/// stamped at midnight so it lines up with daily fragments. The result is
/// labelled `"now 7-d"`.
#[must_use]
pub fn complete_days_from_hourly(frame: &RawFrame) -> TimeSeries {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for p in &frame.points {
        let e = days.entry(p.ts.date()).or_insert((0.0, 0));
        e.0 += p.value;
        e.1 += 1;
    }
    TimeSeries::from_values(
        "now 7-d",
        days.into_iter()
            .filter(|(_, (_, n))| *n == HOURS_PER_DAY)
            .map(|(d, (sum, _))| (d.and_time(NaiveTime::MIN), sum)),
    )
}
