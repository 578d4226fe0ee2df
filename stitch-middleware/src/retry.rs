use std::sync::Arc;
use std::time::Duration;

use stitch_core::{
    Payload, RawFrame, RetryConfig, StitchError, Timeframe, TrendFetcher, TrendQuery,
};

use crate::backoff::jitter_wait;

/// Applies the two-layer retry policy to one fetcher.
///
/// Payload construction is retried on `MalformedRequest` and `TransientFetch`
/// with a linear backoff; retrieval is attempted up to
/// `retrieval_attempts` times with an exponential wait before each attempt.
/// Both layers degrade exhaustion to "no data" (`Ok(None)`), so a caller
/// building fragments stops at the failed window and keeps what it has.
/// Fatal errors are returned unchanged.
#[derive(Clone)]
pub struct RetryingFetcher {
    inner: Arc<dyn TrendFetcher>,
    cfg: RetryConfig,
}

impl RetryingFetcher {
    /// Wrap `inner` with the policy in `cfg`.
    #[must_use]
    pub fn new(inner: Arc<dyn TrendFetcher>, cfg: RetryConfig) -> Self {
        Self { inner, cfg }
    }

    /// The active policy.
    #[must_use]
    pub const fn config(&self) -> &RetryConfig {
        &self.cfg
    }

    /// The wrapped fetcher.
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn TrendFetcher> {
        &self.inner
    }

    /// Fetch one timeframe, returning `None` when the source has no usable data.
    ///
    /// # Errors
    /// Returns `Unsupported` if the fetcher cannot serve `timeframe`, and
    /// propagates errors that are neither retryable nor "no data".
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "stitch::middleware::retry::fetch",
            skip(self, query, timeframe),
            fields(fetcher = self.inner.name(), keyword = %query.keyword, timeframe = %timeframe),
        )
    )]
    pub async fn fetch(
        &self,
        query: &TrendQuery,
        timeframe: &Timeframe,
    ) -> Result<Option<RawFrame>, StitchError> {
        if !self.inner.supports_timeframe(timeframe) {
            return Err(StitchError::unsupported(format!(
                "{} timeframe {timeframe}",
                self.inner.name()
            )));
        }
        let Some(payload) = self.build_payload(query, timeframe).await? else {
            return Ok(None);
        };
        self.retrieve(&payload).await
    }

    async fn build_payload(
        &self,
        query: &TrendQuery,
        timeframe: &Timeframe,
    ) -> Result<Option<Payload>, StitchError> {
        let mut attempt: u32 = 0;
        loop {
            match self.inner.build_payload(query, timeframe).await {
                Ok(payload) => return Ok(Some(payload)),
                Err(e) if e.is_request_retryable() => {
                    if attempt >= self.cfg.request_retries {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            error = %e,
                            attempts = attempt + 1,
                            "giving up on payload construction"
                        );
                        return Ok(None);
                    }
                    let wait =
                        jitter_wait(self.cfg.request_backoff(attempt), self.cfg.jitter_percent);
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        error = %e,
                        attempt,
                        wait = ?wait,
                        "retrying payload construction"
                    );
                    sleep(wait).await;
                    attempt += 1;
                }
                Err(e) if e.is_no_data() => return Ok(None),
                Err(e) => return Err(e),
            }
        }
    }

    async fn retrieve(&self, payload: &Payload) -> Result<Option<RawFrame>, StitchError> {
        for attempt in 0..self.cfg.retrieval_attempts {
            let wait = jitter_wait(self.cfg.retrieval_backoff(attempt), self.cfg.jitter_percent);
            sleep(wait).await;
            match self.inner.interest_over_time(payload).await {
                Ok(outcome) => return Ok(outcome.into_frame()),
                Err(e) if e.is_no_data() => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(error = %e, "treating window as empty");
                    return Ok(None);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %_e, attempt, "retrieval failed");
                }
            }
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(
            attempts = self.cfg.retrieval_attempts,
            timeframe = %payload.timeframe,
            "retrieval attempts exhausted"
        );
        Ok(None)
    }
}

async fn sleep(wait: Duration) {
    if !wait.is_zero() {
        tokio::time::sleep(wait).await;
    }
}
