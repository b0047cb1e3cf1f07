use crate::core::descriptors::composition::composition;
use crate::core::models::sequence::Sequence;
use serde::Deserialize;

/// Dissimilarity measure used by diversity sampling. Both metrics are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceMetric {
    /// Fraction of differing positions; unmatched tail positions count as differences.
    #[default]
    Hamming,
    /// Half the L1 distance between residue-fraction vectors.
    Composition,
}

impl DistanceMetric {
    pub fn distance(self, a: &Sequence, b: &Sequence) -> f64 {
        match self {
            DistanceMetric::Hamming => hamming_distance(a, b),
            DistanceMetric::Composition => composition_distance(a, b),
        }
    }
}

pub fn hamming_distance(a: &Sequence, b: &Sequence) -> f64 {
    let longest = a.len().max(b.len());
    let mismatches = a.iter().zip(b.iter()).filter(|(x, y)| x != y).count()
        + (a.len().abs_diff(b.len()));
    mismatches as f64 / longest as f64
}

pub fn composition_distance(a: &Sequence, b: &Sequence) -> f64 {
    let ca = composition(a);
    let cb = composition(b);
    ca.iter().zip(cb.iter()).map(|(x, y)| (x - y).abs()).sum::<f64>() / 2.0
}

/// Smallest distance from `candidate` to any member of `accepted`.
/// An empty set is infinitely far away.
pub fn min_distance_to_set(metric: DistanceMetric, candidate: &Sequence, accepted: &[Sequence]) -> f64 {
    accepted
        .iter()
        .map(|s| metric.distance(candidate, s))
        .fold(f64::INFINITY, f64::min)
}

/// Smallest pairwise distance within `set`; infinite for fewer than two members.
pub fn min_pairwise_distance(metric: DistanceMetric, set: &[Sequence]) -> f64 {
    set.iter()
        .enumerate()
        .flat_map(|(i, a)| set[i + 1..].iter().map(move |b| metric.distance(a, b)))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn seq(s: &str) -> Sequence {
        Sequence::parse(s).unwrap()
    }

    #[test]
    fn hamming_distance_of_identical_sequences_is_zero() {
        assert!(hamming_distance(&seq("ACDE"), &seq("ACDE")).abs() < TOLERANCE);
    }

    #[test]
    fn hamming_distance_counts_mismatched_positions() {
        assert!((hamming_distance(&seq("ACDE"), &seq("ACKK")) - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn hamming_distance_counts_length_difference() {
        assert!((hamming_distance(&seq("AC"), &seq("ACDE")) - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn composition_distance_ignores_order() {
        assert!(composition_distance(&seq("KLKL"), &seq("LLKK")).abs() < TOLERANCE);
        assert!((composition_distance(&seq("KKKK"), &seq("DDDD")) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn metric_dispatches_to_matching_function() {
        let a = seq("KLKL");
        let b = seq("LLKK");
        assert!((DistanceMetric::Hamming.distance(&a, &b) - 0.5).abs() < TOLERANCE);
        assert!(DistanceMetric::Composition.distance(&a, &b).abs() < TOLERANCE);
    }

    #[test]
    fn min_distance_to_empty_set_is_infinite() {
        assert!(min_distance_to_set(DistanceMetric::Hamming, &seq("A"), &[]).is_infinite());
    }

    #[test]
    fn min_pairwise_distance_finds_closest_pair() {
        let set = [seq("AAAA"), seq("AAAK"), seq("KKKK")];
        assert!((min_pairwise_distance(DistanceMetric::Hamming, &set) - 0.25).abs() < TOLERANCE);
        assert!(min_pairwise_distance(DistanceMetric::Hamming, &set[..1]).is_infinite());
    }
}
