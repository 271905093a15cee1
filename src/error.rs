use chrono::{DateTime, FixedOffset};
use thiserror::Error;

/// Errors that abort an estimation run.
///
/// Segment-level modeling failures are deliberately not represented here;
/// those are [`ModelError`]s and are recovered inside the aggregator as a
/// zero contribution.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The weather record is malformed or the requested range is empty.
    #[error("weather data error: {0}")]
    DataQuality(String),

    /// Segment results disagree on the timestamp index. Summing them would
    /// be meaningless, so the run aborts.
    #[error("segment alignment error: {0}")]
    Alignment(String),

    /// Invalid run configuration, surfaced before any computation starts.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

/// A per-segment modeling failure.
///
/// Never fatal to the run: the aggregator replaces the failing segment's
/// contribution with zero power across the whole weather index and keeps
/// going.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A weather input the model depends on is NaN or infinite.
    #[error("non-finite {field} in weather sample at {timestamp}")]
    NonFiniteInput {
        timestamp: DateTime<FixedOffset>,
        field: &'static str,
    },

    /// The segment parameters cannot be modeled.
    #[error("invalid segment parameters: {0}")]
    InvalidSegment(String),
}
