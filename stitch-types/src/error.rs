use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the stitch workspace.
///
/// Fetch failures are split into the three classes the retry policy
/// distinguishes; combination failures are surfaced as their own variants so
/// callers never receive infinite or NaN coefficients.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StitchError {
    /// The requested capability is not implemented by the target fetcher.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "timeframe/now 7-d").
        capability: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The source rejected the request parameters (payload construction failed).
    #[error("malformed request: {msg}")]
    MalformedRequest {
        /// Human-readable description of the rejection.
        msg: String,
    },

    /// Network or rate-limit failure while retrieving data; worth retrying.
    #[error("transient fetch failure: {msg}")]
    TransientFetch {
        /// Human-readable description of the failure.
        msg: String,
    },

    /// The source answered with an unexpected shape (missing fields, short rows).
    #[error("unexpected response shape: {msg}")]
    StructuralFetch {
        /// Human-readable description of what was missing.
        msg: String,
    },

    /// The source has no data for the requested window or range.
    #[error("no data: {what}")]
    NoData {
        /// Description of what was requested, e.g. "2017-01-01 2017-09-27".
        what: String,
    },

    /// A scale coefficient or the final renormalization would divide by zero.
    #[error("zero maximum while scaling {seam}")]
    DivideByZeroScale {
        /// The seam (pair of labels) or series whose maximum was zero.
        seam: String,
    },

    /// Two adjacent inputs to the combiner share no timestamps.
    #[error("no overlapping samples at {seam}")]
    DisjointFragments {
        /// The seam (pair of labels) without shared samples.
        seam: String,
    },

    /// The series store failed to read or persist an entry.
    #[error("store error: {0}")]
    Store(String),

    /// An individual fetcher returned an error outside the fetch taxonomy.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Fetcher name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl StitchError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `MalformedRequest` error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRequest { msg: msg.into() }
    }

    /// Helper: build a `TransientFetch` error.
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::TransientFetch { msg: msg.into() }
    }

    /// Helper: build a `StructuralFetch` error.
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::StructuralFetch { msg: msg.into() }
    }

    /// Helper: build a `NoData` error for a description of the missing data.
    pub fn no_data(what: impl Into<String>) -> Self {
        Self::NoData { what: what.into() }
    }

    /// Helper: build a `DivideByZeroScale` error for a seam description.
    pub fn divide_by_zero(seam: impl Into<String>) -> Self {
        Self::DivideByZeroScale { seam: seam.into() }
    }

    /// Helper: build a `DisjointFragments` error for a seam description.
    pub fn disjoint(seam: impl Into<String>) -> Self {
        Self::DisjointFragments { seam: seam.into() }
    }

    /// Helper: build a `Connector` error with the fetcher name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Returns true for failures the request-construction layer retries.
    #[must_use]
    pub const fn is_request_retryable(&self) -> bool {
        matches!(
            self,
            Self::MalformedRequest { .. } | Self::TransientFetch { .. }
        )
    }

    /// Returns true for failures that mean "this window has no usable data"
    /// rather than "try again".
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::StructuralFetch { .. } | Self::NoData { .. })
    }

    /// Returns true if no combination of retries can make the operation succeed.
    ///
    /// Combination failures and argument errors are fatal; fetch failures are
    /// not, because the retry policy degrades them to missing windows.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DivideByZeroScale { .. }
                | Self::DisjointFragments { .. }
                | Self::InvalidArg(_)
                | Self::Store(_)
        )
    }
}

impl From<chrono::ParseError> for StitchError {
    fn from(e: chrono::ParseError) -> Self {
        Self::InvalidArg(e.to_string())
    }
}
