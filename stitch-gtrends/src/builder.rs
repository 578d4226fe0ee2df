use std::sync::Arc;

use stitch_core::{CacheConfig, StitchError, TrendFetcher};
use stitch_middleware::FetcherBuilder;

use crate::{GtrendsConfig, GtrendsConnector};

/// Builder type alias specialized for the trends connector.
pub type GtrendsConnectorBuilder = FetcherBuilder;

impl GtrendsConnector {
    /// Returns an unconfigured builder around a connector built from `cfg`.
    ///
    /// Customize with the builder methods before calling `.build()`.
    ///
    /// # Errors
    /// Returns an error if the connector cannot be constructed.
    pub fn builder(cfg: GtrendsConfig) -> Result<GtrendsConnectorBuilder, StitchError> {
        let raw: Arc<dyn TrendFetcher> = Arc::new(Self::new(cfg)?);
        Ok(FetcherBuilder::new(raw))
    }

    /// Returns a builder with the default window-response cache enabled.
    ///
    /// # Errors
    /// Returns an error if the connector cannot be constructed.
    pub fn cached(cfg: GtrendsConfig) -> Result<GtrendsConnectorBuilder, StitchError> {
        Ok(Self::builder(cfg)?.with_cache(&CacheConfig::default()))
    }
}
