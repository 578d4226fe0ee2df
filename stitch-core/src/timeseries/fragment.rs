use std::future::Future;

use chrono::{NaiveDate, TimeDelta};

use crate::StitchError;
use stitch_types::{RawFrame, TimeSeries, Window};

/// One fetched window together with its locally normalized data.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Window the data was requested for.
    pub window: Window,
    /// The returned data, labelled with the window string.
    pub series: TimeSeries,
}

impl From<Fragment> for TimeSeries {
    fn from(f: Fragment) -> Self {
        f.series
    }
}

/// Check the fragment geometry for a request.
///
/// # Errors
/// Returns `InvalidArg` when `start > end`, `overlap_days <= 0` or
/// `delta_days <= overlap_days`.
pub fn validate_geometry(
    start: NaiveDate,
    end: NaiveDate,
    delta_days: i64,
    overlap_days: i64,
) -> Result<(), StitchError> {
    if start > end {
        return Err(StitchError::InvalidArg(format!(
            "start {start} is after end {end}"
        )));
    }
    if overlap_days <= 0 {
        return Err(StitchError::InvalidArg(format!(
            "overlap must be positive (got {overlap_days})"
        )));
    }
    if delta_days <= overlap_days {
        return Err(StitchError::InvalidArg(format!(
            "delta ({delta_days}) must exceed overlap ({overlap_days})"
        )));
    }
    Ok(())
}

/// Cover `[start, end]` with overlapping windows, newest first, and return the
/// fetched fragments in chronological order.
///
/// The first window is `[end - delta_days, end]`; each following window moves
/// back by `delta_days - overlap_days`, so consecutive windows share
/// `overlap_days + 1` calendar days. Generation continues while the current
/// window ends after `start`, and stops early as soon as `fetch` reports no
/// data (`Ok(None)` or an empty frame). The oldest window may begin before
/// `start`.
///
/// # Errors
/// Returns `InvalidArg` for invalid geometry or windows outside the calendar
/// range, and propagates any error returned by `fetch`.
pub async fn generate_fragments<F, Fut>(
    mut fetch: F,
    start: NaiveDate,
    end: NaiveDate,
    delta_days: i64,
    overlap_days: i64,
) -> Result<Vec<Fragment>, StitchError>
where
    F: FnMut(Window) -> Fut,
    Fut: Future<Output = Result<Option<RawFrame>, StitchError>>,
{
    validate_geometry(start, end, delta_days, overlap_days)?;
    let step = delta_days - overlap_days;
    let first = TimeDelta::try_days(delta_days)
        .and_then(|delta| end.checked_sub_signed(delta))
        .ok_or_else(|| {
            StitchError::InvalidArg(format!(
                "fragment of {delta_days} days before {end} is out of range"
            ))
        })?;
    let mut window = Window::new(first, end)?;
    let mut out = Vec::new();

    while window.end() > start {
        let Some(frame) = fetch(window).await? else {
            break;
        };
        if frame.is_empty() {
            break;
        }
        let label = window.to_string();
        out.push(Fragment {
            window,
            series: frame.into_series(label),
        });
        window = window.checked_shifted_back(step).ok_or_else(|| {
            StitchError::InvalidArg(format!("window {window} cannot move back {step} days"))
        })?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        fragments = out.len(),
        %start,
        %end,
        "generated fragments"
    );

    out.reverse();
    Ok(out)
}
