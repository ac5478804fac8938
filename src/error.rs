use thiserror::Error;

/// Pipeline error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PdrError {
    #[error("Need at least 2 samples to derive a sampling rate, got {count}")]
    InsufficientSamples { count: usize },

    #[error("Timestamps do not increase on average, cannot derive a sampling rate")]
    NonIncreasingTimestamps,
}

/// Result type for pipeline operations
pub type PdrResult<T> = Result<T, PdrError>;
