use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::StitchError;
use stitch_types::{Point, TimeSeries};

/// Ratio that maps `next` onto the scale of `reference` over their overlap.
///
/// The overlap is `[next.first_ts, overlap_end]`. The coefficient is the
/// largest value of `reference` in the overlap divided by the largest value of
/// `next` in the same range.
///
/// # Errors
/// - `DisjointFragments` when the overlap is empty or either side has no
///   samples in it.
/// - `DivideByZeroScale` when either maximum is zero.
pub fn scale_coefficient(
    reference: &TimeSeries,
    next: &TimeSeries,
    overlap_end: NaiveDateTime,
) -> Result<f64, StitchError> {
    let seam = seam_label(reference, next);
    let Some(overlap_start) = next.first_ts() else {
        return Err(StitchError::disjoint(seam));
    };
    if overlap_start > overlap_end {
        return Err(StitchError::disjoint(seam));
    }
    let ref_max = reference.max_between(overlap_start, overlap_end);
    let next_max = next.max_between(overlap_start, overlap_end);
    match (ref_max, next_max) {
        (Some(r), Some(n)) if r > 0.0 && n > 0.0 => Ok(r / n),
        (Some(_), Some(_)) => Err(StitchError::divide_by_zero(seam)),
        _ => Err(StitchError::disjoint(seam)),
    }
}

fn seam_label(reference: &TimeSeries, next: &TimeSeries) -> String {
    format!("{} | {}", reference.label(), next.label())
}

/// Rescaled columns accumulated by the fold.
struct Columns {
    columns: Vec<TimeSeries>,
    last_ts: NaiveDateTime,
}

impl Columns {
    fn new(first: TimeSeries) -> Option<Self> {
        let last_ts = first.last_ts()?;
        Some(Self {
            columns: vec![first],
            last_ts,
        })
    }

    fn push(&mut self, next: TimeSeries) -> Result<(), StitchError> {
        let Some(reference) = self.columns.last() else {
            return Err(StitchError::no_data("combine"));
        };
        let coef = scale_coefficient(reference, &next, self.last_ts)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            reference = reference.label(),
            next = next.label(),
            coef,
            "rescaled fragment"
        );

        if let Some(ts) = next.last_ts() {
            self.last_ts = self.last_ts.max(ts);
        }
        self.columns.push(next.scaled(coef));
        Ok(())
    }

    /// Average every timestamp across the columns that cover it, then rescale
    /// so the maximum is 100.
    fn collapse(self) -> Result<TimeSeries, StitchError> {
        let mut rows: BTreeMap<NaiveDateTime, (f64, usize)> = BTreeMap::new();
        for col in &self.columns {
            for p in col.points() {
                let e = rows.entry(p.ts).or_insert((0.0, 0));
                e.0 += p.value;
                e.1 += 1;
            }
        }
        let mean: Vec<Point> = rows
            .into_iter()
            .map(|(ts, (sum, n))| Point {
                ts,
                value: sum / n as f64,
                blended: n > 1,
            })
            .collect();
        let merged = TimeSeries::try_new("", mean)?;
        let label = merged.span_label();
        match merged.max_value() {
            Some(max) if max > 0.0 => Ok(merged.scaled(100.0 / max).with_label(label)),
            _ => Err(StitchError::divide_by_zero(label)),
        }
    }
}

/// Combine chronologically ordered series into one series on a common scale.
///
/// Each series after the first is rescaled against the most recently added
/// (already rescaled) column, using the overlap between its first timestamp
/// and the latest timestamp seen so far. Timestamps covered by several columns
/// are averaged and flagged `blended`. The result is rescaled so its maximum
/// equals 100 and labelled with its span.
///
/// A single input is returned unchanged. Empty inputs are skipped.
///
/// # Errors
/// - `NoData` when no non-empty series is given.
/// - `DisjointFragments` when a series does not overlap its predecessor.
/// - `DivideByZeroScale` when an overlap maximum or the final maximum is zero.
///
/// ```
/// use chrono::NaiveDate;
/// use stitch_core::{TimeSeries, combine};
///
/// let day = |d: u32| NaiveDate::from_ymd_opt(2020, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let a = TimeSeries::from_values("a", [(day(1), 50.0), (day(2), 100.0), (day(3), 40.0)]);
/// let b = TimeSeries::from_values("b", [(day(2), 100.0), (day(3), 40.0), (day(4), 20.0)]);
/// let out = combine(vec![a, b]).unwrap();
/// assert_eq!(out.value_at(day(2)), Some(100.0));
/// assert_eq!(out.value_at(day(4)), Some(20.0));
/// ```
pub fn combine(series: Vec<TimeSeries>) -> Result<TimeSeries, StitchError> {
    let mut iter = series.into_iter().filter(|s| !s.is_empty());
    let Some(first) = iter.next() else {
        return Err(StitchError::no_data("fragments to combine"));
    };
    let mut rest = iter.peekable();
    if rest.peek().is_none() {
        return Ok(first);
    }
    let Some(mut columns) = Columns::new(first) else {
        return Err(StitchError::no_data("fragments to combine"));
    };
    for next in rest {
        columns.push(next)?;
    }
    columns.collapse()
}
