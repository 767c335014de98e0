use imgsig_fingerprint::Fingerprint;

use crate::config::check_epsilon;
use crate::TreeError;

/// Split of a candidate set around its median similarity to a pivot.
///
/// Positions index into the candidate slice handed to [`bifurcate`]. With
/// epsilon 0 the two sets are disjoint and cover every position once; with
/// epsilon > 0 positions inside `[midpoint - epsilon, midpoint + epsilon]`
/// appear in both.
#[derive(Debug, Clone, PartialEq)]
pub struct Bifurcation {
    pub midpoint: f64,
    pub lesser: Vec<usize>,
    pub greater_or_equal: Vec<usize>,
}

impl Bifurcation {
    /// Partitions precomputed pivot scores.
    ///
    /// The midpoint is the element at index `len / 2` of the ascending
    /// sort. No averaging happens for even lengths.
    pub fn from_scores(scores: &[f64], epsilon: f64) -> Result<Self, TreeError> {
        if scores.is_empty() {
            return Err(TreeError::InvalidInput(
                "cannot bifurcate an empty candidate set".into(),
            ));
        }
        check_epsilon(epsilon)?;

        let mut sorted = scores.to_vec();
        sorted.sort_by(f64::total_cmp);
        let midpoint = sorted[sorted.len() / 2];

        let mut lesser = Vec::new();
        let mut greater_or_equal = Vec::new();

        if epsilon > 0.0 {
            for (i, &score) in scores.iter().enumerate() {
                if score <= midpoint + epsilon {
                    lesser.push(i);
                }
                if score >= midpoint - epsilon {
                    greater_or_equal.push(i);
                }
            }
        } else {
            for (i, &score) in scores.iter().enumerate() {
                if score < midpoint {
                    lesser.push(i);
                } else {
                    greater_or_equal.push(i);
                }
            }
        }

        Ok(Self {
            midpoint,
            lesser,
            greater_or_equal,
        })
    }
}

/// Scores every candidate against `pivot` and splits them at the median.
///
/// Fails with [`TreeError::InvalidInput`] when `candidates` is empty and
/// propagates comparator failures.
pub fn bifurcate<F: Fingerprint>(
    candidates: &[&F],
    pivot: &F,
    epsilon: f64,
) -> Result<Bifurcation, TreeError> {
    let scores = candidates
        .iter()
        .map(|c| pivot.compare(c))
        .collect::<Result<Vec<_>, _>>()?;
    Bifurcation::from_scores(&scores, epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{Broken, Point};

    fn covers_once(b: &Bifurcation, n: usize) -> bool {
        let mut seen = vec![0usize; n];
        for &i in b.lesser.iter().chain(&b.greater_or_equal) {
            seen[i] += 1;
        }
        seen.iter().all(|&c| c == 1)
    }

    #[test]
    fn empty_is_invalid() {
        let err = bifurcate::<Point>(&[], &Point(0.0), 0.0).unwrap_err();
        assert!(matches!(err, TreeError::InvalidInput(_)));
    }

    #[test]
    fn negative_epsilon_is_invalid() {
        let err = Bifurcation::from_scores(&[0.5], -0.01).unwrap_err();
        assert!(matches!(err, TreeError::InvalidInput(_)));
    }

    #[test]
    fn midpoint_is_middle_of_sorted_scores() {
        let b = Bifurcation::from_scores(&[0.9, 0.1, 0.5], 0.0).unwrap();
        assert_eq!(b.midpoint, 0.5);
        assert_eq!(b.lesser, vec![1]);
        assert_eq!(b.greater_or_equal, vec![0, 2]);

        // Even length: index len/2, never an average.
        let b = Bifurcation::from_scores(&[0.4, 0.2, 0.8, 0.6], 0.0).unwrap();
        assert_eq!(b.midpoint, 0.6);
        assert_eq!(b.lesser, vec![0, 1]);
        assert_eq!(b.greater_or_equal, vec![2, 3]);
    }

    #[test]
    fn single_candidate_goes_greater() {
        let b = Bifurcation::from_scores(&[0.3], 0.0).unwrap();
        assert_eq!(b.midpoint, 0.3);
        assert!(b.lesser.is_empty());
        assert_eq!(b.greater_or_equal, vec![0]);
    }

    #[test]
    fn exact_split_is_complete_and_disjoint() {
        let cases: &[&[f64]] = &[
            &[0.5],
            &[0.5, 0.5, 0.5],
            &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7],
            &[0.99, 0.01, 0.5, 0.5, 0.25, 0.75],
            &[0.3, 0.3, 0.9, 0.1],
        ];
        for scores in cases {
            let b = Bifurcation::from_scores(scores, 0.0).unwrap();
            assert!(covers_once(&b, scores.len()), "scores {scores:?} -> {b:?}");
            for &i in &b.lesser {
                assert!(scores[i] < b.midpoint);
            }
            for &i in &b.greater_or_equal {
                assert!(scores[i] >= b.midpoint);
            }
        }
    }

    #[test]
    fn clustered_scores_are_unbalanced() {
        let b = Bifurcation::from_scores(&[0.5, 0.5, 0.5, 0.1], 0.0).unwrap();
        assert_eq!(b.midpoint, 0.5);
        assert_eq!(b.lesser, vec![3]);
        assert_eq!(b.greater_or_equal, vec![0, 1, 2]);
    }

    #[test]
    fn fuzzy_band_lands_in_both_sets() {
        let scores = [0.1, 0.45, 0.5, 0.54, 0.6, 0.9];
        let eps = 0.05;
        let b = Bifurcation::from_scores(&scores, eps).unwrap();
        assert_eq!(b.midpoint, 0.54);

        for (i, &s) in scores.iter().enumerate() {
            let in_lesser = b.lesser.contains(&i);
            let in_greater = b.greater_or_equal.contains(&i);
            assert!(in_lesser || in_greater, "index {i} dropped");
            if (b.midpoint - eps..=b.midpoint + eps).contains(&s) {
                assert!(in_lesser && in_greater, "index {i} ({s}) should be in both");
            }
        }
        assert_eq!(b.lesser, vec![0, 1, 2, 3]);
        assert_eq!(b.greater_or_equal, vec![2, 3, 4, 5]);
    }

    #[test]
    fn scores_against_pivot() {
        let pivot = Point(0.0);
        let (b, c, d) = (Point(0.125), Point(0.875), Point(0.5));
        let out = bifurcate(&[&b, &c, &d], &pivot, 0.0).unwrap();
        // scores 0.875, 0.125, 0.5
        assert_eq!(out.midpoint, 0.5);
        assert_eq!(out.lesser, vec![1]);
        assert_eq!(out.greater_or_equal, vec![0, 2]);
    }

    #[test]
    fn comparator_failure_propagates() {
        let err = bifurcate(&[&Broken], &Broken, 0.0).unwrap_err();
        assert!(matches!(err, TreeError::Comparator(_)));
    }
}
