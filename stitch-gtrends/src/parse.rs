//! Pure request/response helpers for the explore and multiline endpoints.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::{Value, json};

use stitch_core::{FetchOutcome, RawFrame, RawPoint, StitchError, Timeframe, TrendQuery};

/// Drop the anti-JSON-hijacking prefix (e.g. `)]}'`) in front of a response body.
#[must_use]
pub fn strip_hijack_prefix(body: &str) -> &str {
    body.find('{').map_or(body, |i| &body[i..])
}

/// The `req` parameter of an explore call.
#[must_use]
pub fn explore_request(query: &TrendQuery, timeframe: &Timeframe) -> Value {
    json!({
        "comparisonItem": [{
            "keyword": query.keyword,
            "time": timeframe.to_string(),
            "geo": query.geo,
        }],
        "category": query.cat,
        "property": query.gprop,
    })
}

#[derive(Deserialize)]
struct ExploreResponse {
    widgets: Vec<Widget>,
}

#[derive(Deserialize)]
struct Widget {
    id: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    request: Option<Value>,
}

/// Token and request body of the `TIMESERIES` widget in an explore response.
///
/// # Errors
/// Returns `StructuralFetch` if the body is not an explore response or has no
/// time-series widget.
pub fn parse_explore(body: &str) -> Result<(String, Value), StitchError> {
    let resp: ExploreResponse = serde_json::from_str(strip_hijack_prefix(body))
        .map_err(|e| StitchError::structural(format!("explore response: {e}")))?;
    resp.widgets
        .into_iter()
        .find(|w| w.id == "TIMESERIES")
        .and_then(|w| Some((w.token?, w.request?)))
        .ok_or_else(|| StitchError::structural("explore response has no TIMESERIES widget"))
}

#[derive(Deserialize)]
struct MultilineResponse {
    default: Timeline,
}

#[derive(Deserialize)]
struct Timeline {
    #[serde(rename = "timelineData")]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Deserialize)]
struct TimelinePoint {
    time: String,
    value: Vec<f64>,
    #[serde(rename = "isPartial", default)]
    is_partial: bool,
}

/// Rows of a multiline (interest over time) response.
///
/// Timestamps are Unix seconds, converted to naive UTC. An empty timeline is
/// reported as [`FetchOutcome::NoData`].
///
/// # Errors
/// Returns `StructuralFetch` for bodies that do not have the expected shape.
pub fn parse_multiline(body: &str) -> Result<FetchOutcome, StitchError> {
    let resp: MultilineResponse = serde_json::from_str(strip_hijack_prefix(body))
        .map_err(|e| StitchError::structural(format!("multiline response: {e}")))?;
    if resp.default.timeline_data.is_empty() {
        return Ok(FetchOutcome::NoData);
    }
    let mut points = Vec::with_capacity(resp.default.timeline_data.len());
    for row in resp.default.timeline_data {
        let secs: i64 = row
            .time
            .parse()
            .map_err(|_| StitchError::structural(format!("bad timeline time {:?}", row.time)))?;
        let ts = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| StitchError::structural(format!("timestamp out of range: {secs}")))?
            .naive_utc();
        let value = row
            .value
            .first()
            .copied()
            .ok_or_else(|| StitchError::structural("timeline row without value"))?;
        points.push(RawPoint {
            ts,
            value,
            is_partial: row.is_partial,
        });
    }
    Ok(FetchOutcome::Data(RawFrame { points }))
}
