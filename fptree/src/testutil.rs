//! Test fingerprints with hand-picked similarities.

use imgsig_fingerprint::{Fingerprint, FingerprintError};

use crate::Collection;

/// A position on a line; similarity is `1 - |a - b|`.
///
/// Symmetric, exactly 1.0 against itself, and easy to reason about when
/// laying out pivots and midpoints by hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Point(pub f64);

impl Fingerprint for Point {
    fn compare(&self, other: &Self) -> Result<f64, FingerprintError> {
        Ok(1.0 - (self.0 - other.0).abs())
    }
}

/// Always fails to compare, standing in for a malformed fingerprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Broken;

impl Fingerprint for Broken {
    fn compare(&self, _other: &Self) -> Result<f64, FingerprintError> {
        Err(FingerprintError::SizeMismatch {
            expected: 64,
            got: 0,
        })
    }
}

/// Builds a collection of points from `(id, position)` pairs, in order.
pub(crate) fn points(pairs: &[(&str, f64)]) -> Collection<Point> {
    let mut c = Collection::new();
    for &(id, pos) in pairs {
        c.push(id, Point(pos));
    }
    c
}
