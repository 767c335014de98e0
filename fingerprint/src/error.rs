use thiserror::Error;

/// Errors returned by fingerprint operations.
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("size mismatch: expected {expected} words, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    #[error("fingerprint capacity must be positive")]
    EmptyCapacity,

    #[error("parse fingerprint: {0}")]
    Parse(String),
}
