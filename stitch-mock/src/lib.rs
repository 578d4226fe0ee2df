//! Mock fetchers for CI-safe tests and demos.
//!
//! - [`SyntheticTrends`] serves windows cut from a known daily "truth"
//!   series, locally normalized the way the real source reports them.
//! - [`DynamicMockFetcher`] defers to a controller that scripts failures,
//!   optionally passing unscripted calls through to another fetcher.

mod dynamic;
mod synthetic;

pub use dynamic::{DynamicMockController, DynamicMockFetcher, MockBehavior};
pub use synthetic::SyntheticTrends;
