use crate::FingerprintError;

/// A perceptual signature that can be scored against another of its kind.
///
/// Scores lie in `[0, 1]` and grow with similarity: `0.0` for fingerprints
/// with nothing in common, exactly `1.0` when a fingerprint is compared
/// with itself. Match cutoffs and the search recovery band are expressed
/// on this scale. Scores should also be symmetric up
/// to floating point noise: `a.compare(b)` and `b.compare(a)` may differ
/// by a negligible amount, never enough to flip a threshold decision.
///
/// # Thread Safety
///
/// Implementations must be safe to share across threads so that an index
/// built over them can serve concurrent read-only searches.
pub trait Fingerprint: Send + Sync {
    /// Scores the similarity between `self` and `other`.
    fn compare(&self, other: &Self) -> Result<f64, FingerprintError>;
}
