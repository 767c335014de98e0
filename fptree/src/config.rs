use serde::{Deserialize, Serialize};

use crate::TreeError;

/// Similarity above which two fingerprints count as the same image.
pub const DUPLICATE_THRESHOLD: f64 = 0.999999999;

/// Overlap band used by fuzzy construction when none is given.
pub const DEFAULT_FUZZY_EPSILON: f64 = 0.07;

/// Minimum similarity accepted as a match during search.
pub const DEFAULT_CUTOFF: f64 = 0.93;

/// Share of the gap between cutoff and 1.0 used as the search-time
/// recovery band around a midpoint.
const RECOVERY_FRACTION: f64 = 0.10;

/// Controls tree construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Width of the band around each midpoint whose candidates go to both
    /// children. 0 builds the exact (non-overlapping) tree.
    /// Default: 0.
    pub epsilon: f64,
}

impl BuildConfig {
    /// Exact tree: every candidate lands on exactly one side.
    pub fn exact() -> Self {
        Self { epsilon: 0.0 }
    }

    /// Fuzzy tree with [`DEFAULT_FUZZY_EPSILON`].
    pub fn fuzzy() -> Self {
        Self::with_epsilon(DEFAULT_FUZZY_EPSILON)
    }

    pub fn with_epsilon(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn is_fuzzy(&self) -> bool {
        self.epsilon > 0.0
    }

    pub(crate) fn validate(&self) -> Result<(), TreeError> {
        check_epsilon(self.epsilon)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::exact()
    }
}

/// Controls tree search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// A node matches when its similarity to the query is strictly above
    /// this value. Must lie in `[0, 1]`, the range every
    /// [`Fingerprint`](imgsig_fingerprint::Fingerprint) scores in.
    /// Default: 0.93.
    pub cutoff: f64,
}

impl SearchConfig {
    pub fn with_cutoff(cutoff: f64) -> Self {
        Self { cutoff }
    }

    /// Tolerance around a midpoint within which a failed branch is retried
    /// on the other side: `(1 - cutoff) * 0.10`.
    pub fn epsilon(&self) -> f64 {
        (1.0 - self.cutoff) * RECOVERY_FRACTION
    }

    pub(crate) fn validate(&self) -> Result<(), TreeError> {
        if !(0.0..=1.0).contains(&self.cutoff) {
            return Err(TreeError::InvalidInput(format!(
                "cutoff {} outside [0, 1]",
                self.cutoff
            )));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
        }
    }
}

/// Controls a [`FingerprintIndex`](crate::FingerprintIndex) end to end.
///
/// Every field has a default, so a config file only needs the values it
/// changes:
///
/// ```yaml
/// build:
///   epsilon: 0.07
/// search:
///   cutoff: 0.9
/// dedup_identifiers: true
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub build: BuildConfig,
    pub search: SearchConfig,

    /// Drop later entries that reuse an earlier identifier. Only needed
    /// when the collection was merged from several sources.
    /// Default: false.
    pub dedup_identifiers: bool,
}

pub(crate) fn check_epsilon(epsilon: f64) -> Result<(), TreeError> {
    if epsilon.is_nan() || epsilon < 0.0 {
        return Err(TreeError::InvalidInput(format!(
            "epsilon must be >= 0, got {epsilon}"
        )));
    }
    Ok(())
}
