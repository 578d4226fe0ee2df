//! stitch-gtrends
//!
//! Fetch client implementing `TrendFetcher` against the Google Trends web
//! endpoints. Building a payload calls `explore` to obtain the time-series
//! widget token; retrieval calls `widgetdata/multiline` with that token.
//!
//! Failures are classified for the retry policy:
//! - explore: 429 and network errors are `TransientFetch`, any other non-2xx
//!   status is `MalformedRequest`.
//! - multiline: 429, 5xx and network errors are `TransientFetch`; other
//!   statuses and unexpected bodies are `StructuralFetch`; an empty timeline
//!   is `FetchOutcome::NoData`.
#![warn(missing_docs)]

mod builder;
mod config;
pub mod parse;

pub use builder::GtrendsConnectorBuilder;
pub use config::{DEFAULT_BASE_URL, GtrendsConfig};

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use stitch_core::{FetchOutcome, Payload, StitchError, Timeframe, TrendFetcher, TrendQuery};

const NAME: &str = "stitch-gtrends";
const EXPLORE_PATH: &str = "/trends/api/explore";
const MULTILINE_PATH: &str = "/trends/api/widgetdata/multiline";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Public connector type.
pub struct GtrendsConnector {
    http: reqwest::Client,
    cfg: GtrendsConfig,
}

impl GtrendsConnector {
    /// Build with a fresh cookie-enabled `reqwest::Client`.
    ///
    /// # Errors
    /// Returns `Connector` if the HTTP client cannot be constructed and
    /// `InvalidArg` if `cfg.base_url` is not a valid URL.
    pub fn new(cfg: GtrendsConfig) -> Result<Self, StitchError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(cfg.user_agent.as_deref().unwrap_or(USER_AGENT))
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| StitchError::connector(NAME, e.to_string()))?;
        Self::with_client(http, cfg)
    }

    /// Build with default settings against the public service.
    ///
    /// # Errors
    /// Returns `Connector` if the HTTP client cannot be constructed.
    pub fn new_default() -> Result<Self, StitchError> {
        Self::new(GtrendsConfig::default())
    }

    /// Build from an existing `reqwest::Client`.
    ///
    /// Note: the session cookie flow needs a client with a cookie store.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `cfg.base_url` is not a valid URL.
    pub fn with_client(http: reqwest::Client, cfg: GtrendsConfig) -> Result<Self, StitchError> {
        Url::parse(&cfg.base_url)
            .map_err(|e| StitchError::InvalidArg(format!("base url {}: {e}", cfg.base_url)))?;
        Ok(Self { http, cfg })
    }

    /// The active settings.
    #[must_use]
    pub const fn config(&self) -> &GtrendsConfig {
        &self.cfg
    }

    fn endpoint(&self, path: &str) -> Result<Url, StitchError> {
        Url::parse(&self.cfg.base_url)
            .and_then(|base| base.join(path))
            .map_err(|e| StitchError::InvalidArg(format!("endpoint {path}: {e}")))
    }

    async fn get(&self, url: Url) -> Result<(StatusCode, String), StitchError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| StitchError::transient(format!("request failed: {e}")))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| StitchError::transient(format!("reading body failed: {e}")))?;
        Ok((status, body))
    }
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[async_trait]
impl TrendFetcher for GtrendsConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "Google Trends"
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "stitch_gtrends::build_payload",
            skip(self, query, timeframe),
            fields(keyword = %query.keyword, timeframe = %timeframe),
        )
    )]
    async fn build_payload(
        &self,
        query: &TrendQuery,
        timeframe: &Timeframe,
    ) -> Result<Payload, StitchError> {
        let mut url = self.endpoint(EXPLORE_PATH)?;
        let req = parse::explore_request(query, timeframe);
        url.query_pairs_mut()
            .append_pair("hl", &self.cfg.hl)
            .append_pair("tz", &self.cfg.tz.to_string())
            .append_pair("req", &req.to_string());

        let (status, body) = self.get(url).await?;
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(StitchError::transient(format!("explore: {status}")));
        }
        if !status.is_success() {
            return Err(StitchError::malformed(format!("explore: {status}")));
        }
        let (token, request) = parse::parse_explore(&body)?;
        Ok(Payload {
            query: query.clone(),
            timeframe: *timeframe,
            token: Some(token),
            request: Some(request),
        })
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "stitch_gtrends::interest_over_time",
            skip(self, payload),
            fields(keyword = %payload.query.keyword, timeframe = %payload.timeframe),
        )
    )]
    async fn interest_over_time(&self, payload: &Payload) -> Result<FetchOutcome, StitchError> {
        let (Some(token), Some(request)) = (&payload.token, &payload.request) else {
            return Err(StitchError::structural("payload has no widget token"));
        };
        let mut url = self.endpoint(MULTILINE_PATH)?;
        url.query_pairs_mut()
            .append_pair("req", &request.to_string())
            .append_pair("token", token)
            .append_pair("tz", &self.cfg.tz.to_string());

        let (status, body) = self.get(url).await?;
        if is_transient(status) {
            return Err(StitchError::transient(format!("multiline: {status}")));
        }
        if !status.is_success() {
            return Err(StitchError::structural(format!("multiline: {status}")));
        }
        parse::parse_multiline(&body)
    }
}
