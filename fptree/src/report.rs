use imgsig_fingerprint::Fingerprint;
use serde::Serialize;

use crate::{Collection, TreeError};

/// Similarity between two entries of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairScore {
    pub first: String,
    pub second: String,
    pub score: f64,
}

/// Closest and farthest similarity seen from one entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremes {
    pub id: String,
    /// Best score against a different fingerprint; 0 when there is none.
    pub max: f64,
    /// Worst score against any entry, itself included.
    pub min: f64,
}

/// Scores every unordered pair `(i, j)`, `i < j`, in scan order.
pub fn pairwise_scores<F: Fingerprint>(
    collection: &Collection<F>,
) -> Result<Vec<PairScore>, TreeError> {
    let entries = collection.entries();
    let mut out = Vec::with_capacity(entries.len() * entries.len().saturating_sub(1) / 2);
    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            out.push(PairScore {
                first: a.id.clone(),
                second: b.id.clone(),
                score: a.fingerprint.compare(&b.fingerprint)?,
            });
        }
    }
    Ok(out)
}

/// Per entry, the highest and lowest similarity against the collection.
///
/// A perfect score only counts towards `max` when the fingerprints differ,
/// which skips the self comparison and exact copies.
pub fn similarity_extremes<F: Fingerprint + PartialEq>(
    collection: &Collection<F>,
) -> Result<Vec<Extremes>, TreeError> {
    let entries = collection.entries();
    let mut out = Vec::with_capacity(entries.len());
    for a in entries {
        let mut max = 0.0f64;
        let mut min = 1.0f64;
        for b in entries {
            let score = a.fingerprint.compare(&b.fingerprint)?;
            if score > max && (score < 1.0 || a.fingerprint != b.fingerprint) {
                max = score;
            }
            min = min.min(score);
        }
        out.push(Extremes {
            id: a.id.clone(),
            max,
            min,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{points, Point};

    #[test]
    fn pairs_in_scan_order() {
        let c = points(&[("a", 0.0), ("b", 0.25), ("c", 0.5)]);
        let pairs = pairwise_scores(&c).unwrap();
        let got: Vec<(&str, &str, f64)> = pairs
            .iter()
            .map(|p| (p.first.as_str(), p.second.as_str(), p.score))
            .collect();
        assert_eq!(got, vec![("a", "b", 0.75), ("a", "c", 0.5), ("b", "c", 0.75)]);
    }

    #[test]
    fn no_pairs_for_one_entry() {
        assert!(pairwise_scores(&points(&[("a", 0.0)])).unwrap().is_empty());
        assert!(pairwise_scores(&Collection::<Point>::new()).unwrap().is_empty());
    }

    #[test]
    fn extremes_skip_identical_fingerprints() {
        let c = points(&[("a", 0.0), ("a-copy", 0.0), ("b", 0.25), ("c", 0.75)]);
        let ex = similarity_extremes(&c).unwrap();
        assert_eq!(ex.len(), 4);

        assert_eq!(ex[0].id, "a");
        assert_eq!(ex[0].max, 0.75);
        assert_eq!(ex[0].min, 0.25);

        assert_eq!(ex[2].id, "b");
        assert_eq!(ex[2].max, 0.75);
        assert_eq!(ex[2].min, 0.5);
    }

    #[test]
    fn lone_entry_extremes() {
        let ex = similarity_extremes(&points(&[("a", 0.3)])).unwrap();
        assert_eq!(ex[0].max, 0.0);
        assert_eq!(ex[0].min, 1.0);
    }
}
