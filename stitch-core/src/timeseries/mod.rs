//! Time-series algorithms used by the orchestrator.
//!
//! Modules include:
//! - `fragment`: walk a range backward in overlapping fetch windows
//! - `combine`: rescale overlapping fragments onto one scale and blend them
//! - `hourly`: aggregate trailing hourly data into complete daily totals
//! - `infer`: detect gaps and duplicate days in a daily series
/// Overlapping fragment rescaling and blending.
pub mod combine;
/// Backward window generation for a date range.
pub mod fragment;
/// Hourly to daily aggregation.
pub mod hourly;
/// Gap and continuity checks.
pub mod infer;
