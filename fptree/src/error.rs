use imgsig_fingerprint::FingerprintError;
use thiserror::Error;

/// Errors returned by fptree operations.
#[derive(Debug, Error)]
pub enum TreeError {
    /// An empty candidate set or an out-of-range parameter.
    #[error("fptree: invalid input: {0}")]
    InvalidInput(String),

    /// A tree node names an identifier the fingerprint store does not hold.
    /// The tree and store are inconsistent; searching further is unsafe.
    #[error("fptree: identifier {id:?} missing from fingerprint store")]
    LookupFailure { id: String },

    #[error("fptree: comparator: {0}")]
    Comparator(#[from] FingerprintError),

    #[error("fptree: {0}")]
    Io(String),

    #[error("fptree: invalid format: {0}")]
    InvalidFormat(String),
}
