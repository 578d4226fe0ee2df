use async_trait::async_trait;

use crate::StitchError;
use stitch_types::{RawFrame, Timeframe, TrendQuery};

/// A prepared request for one timeframe.
///
/// Sources that need a handshake (e.g. a token from an explore endpoint)
/// return it here; simpler sources only echo the query and timeframe.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    /// Query the payload was built for.
    pub query: TrendQuery,
    /// Timeframe the payload was built for.
    pub timeframe: Timeframe,
    /// Opaque access token issued by the source, if any.
    pub token: Option<String>,
    /// Opaque source-specific request body, if any.
    pub request: Option<serde_json::Value>,
}

impl Payload {
    /// Payload without token or request body.
    #[must_use]
    pub const fn new(query: TrendQuery, timeframe: Timeframe) -> Self {
        Self {
            query,
            timeframe,
            token: None,
            request: None,
        }
    }
}

/// Result of a successful retrieval call.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The source returned rows.
    Data(RawFrame),
    /// The source has no data for this timeframe (exhausted or out of range).
    NoData,
}

impl FetchOutcome {
    /// Convert to an optional frame, mapping empty frames to `None`.
    #[must_use]
    pub fn into_frame(self) -> Option<RawFrame> {
        match self {
            Self::Data(frame) if !frame.is_empty() => Some(frame),
            _ => None,
        }
    }
}

/// A source of locally normalized interest data.
///
/// Fetching a timeframe is a two-step exchange: build a payload, then
/// retrieve the rows. Failures are reported with the fetch variants of
/// [`StitchError`] so the retry policy can tell them apart:
/// `MalformedRequest` from `build_payload`, `TransientFetch` and
/// `StructuralFetch` from `interest_over_time`.
#[async_trait]
pub trait TrendFetcher: Send + Sync {
    /// Stable fetcher name used in logs and error tags.
    fn name(&self) -> &'static str;

    /// Vendor or data-source label.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Whether the source can serve `timeframe` at all.
    fn supports_timeframe(&self, _timeframe: &Timeframe) -> bool {
        true
    }

    /// Prepare a request for one timeframe.
    async fn build_payload(
        &self,
        query: &TrendQuery,
        timeframe: &Timeframe,
    ) -> Result<Payload, StitchError>;

    /// Retrieve the rows for a prepared payload.
    async fn interest_over_time(&self, payload: &Payload) -> Result<FetchOutcome, StitchError>;
}
