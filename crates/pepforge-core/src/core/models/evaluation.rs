use super::sequence::Sequence;
use std::collections::BTreeMap;
use std::fmt;

/// Canonical score names written by the evaluator.
pub mod score {
    pub const LENGTH: &str = "length";
    pub const MOLECULAR_WEIGHT: &str = "molecular_weight";
    pub const HYDROPHOBICITY: &str = "hydrophobicity";
    pub const NET_CHARGE: &str = "net_charge";
    pub const ISOELECTRIC_POINT: &str = "isoelectric_point";
    pub const INSTABILITY_INDEX: &str = "instability_index";
    pub const AROMATICITY: &str = "aromaticity";
    pub const HELIX_PROPENSITY: &str = "helix_propensity";
    pub const SHEET_PROPENSITY: &str = "sheet_propensity";
    pub const HYDROPHOBIC_MOMENT: &str = "hydrophobic_moment";
    pub const AMPHIPATHICITY: &str = "amphipathicity";
    pub const STABILITY: &str = "stability_score";
    pub const SOLUBILITY: &str = "solubility_score";
    pub const AMP: &str = "amp_score";
}

/// Scores computed for one sequence.
///
/// Results are created by the evaluator (or decoded from an artifact) and
/// expose no mutating accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    sequence: Sequence,
    scores: BTreeMap<String, f64>,
}

impl EvaluationResult {
    pub(crate) fn new(sequence: Sequence, scores: BTreeMap<String, f64>) -> Self {
        Self { sequence, scores }
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.scores.get(name).copied()
    }

    pub fn scores(&self) -> &BTreeMap<String, f64> {
        &self.scores
    }

    pub fn stability_score(&self) -> Option<f64> {
        self.get(score::STABILITY)
    }

    pub fn solubility_score(&self) -> Option<f64> {
        self.get(score::SOLUBILITY)
    }

    pub fn amp_score(&self) -> Option<f64> {
        self.get(score::AMP)
    }

    pub fn amp_recommendation(&self) -> Option<AmpRecommendation> {
        self.amp_score().map(AmpRecommendation::from_score)
    }

    /// Combines the scores of two results for the same sequence.
    /// Values from `other` win on name collisions.
    pub fn merged_with(&self, other: &EvaluationResult) -> Option<EvaluationResult> {
        if self.sequence != other.sequence {
            return None;
        }
        let mut scores = self.scores.clone();
        scores.extend(other.scores.iter().map(|(k, v)| (k.clone(), *v)));
        Some(Self::new(self.sequence.clone(), scores))
    }
}

/// Qualitative tier derived from an antimicrobial score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmpRecommendation {
    High,
    Moderate,
    Low,
}

impl AmpRecommendation {
    pub const HIGH_THRESHOLD: f64 = 0.7;
    pub const MODERATE_THRESHOLD: f64 = 0.4;

    pub fn from_score(amp_score: f64) -> Self {
        if amp_score > Self::HIGH_THRESHOLD {
            AmpRecommendation::High
        } else if amp_score > Self::MODERATE_THRESHOLD {
            AmpRecommendation::Moderate
        } else {
            AmpRecommendation::Low
        }
    }
}

impl fmt::Display for AmpRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AmpRecommendation::High => "high antimicrobial potential",
            AmpRecommendation::Moderate => "moderate potential, further optimization advised",
            AmpRecommendation::Low => "low potential, consider redesigning the sequence",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(seq: &str, scores: &[(&str, f64)]) -> EvaluationResult {
        EvaluationResult::new(
            Sequence::parse(seq).unwrap(),
            scores.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        )
    }

    #[test]
    fn named_accessors_read_canonical_scores() {
        let r = result("KK", &[(score::STABILITY, 0.5), (score::AMP, 0.8)]);
        assert_eq!(r.stability_score(), Some(0.5));
        assert_eq!(r.amp_score(), Some(0.8));
        assert_eq!(r.solubility_score(), None);
        assert_eq!(r.amp_recommendation(), Some(AmpRecommendation::High));
    }

    #[test]
    fn merged_with_combines_scores_for_same_sequence() {
        let a = result("KK", &[(score::STABILITY, 0.5), (score::LENGTH, 2.0)]);
        let b = result("KK", &[(score::AMP, 0.3), (score::LENGTH, 2.0)]);
        let merged = a.merged_with(&b).unwrap();
        assert_eq!(merged.scores().len(), 3);
        assert_eq!(merged.amp_score(), Some(0.3));
    }

    #[test]
    fn merged_with_rejects_different_sequences() {
        let a = result("KK", &[]);
        let b = result("DD", &[]);
        assert!(a.merged_with(&b).is_none());
    }

    #[test]
    fn recommendation_tiers_use_strict_thresholds() {
        assert_eq!(AmpRecommendation::from_score(0.71), AmpRecommendation::High);
        assert_eq!(AmpRecommendation::from_score(0.7), AmpRecommendation::Moderate);
        assert_eq!(AmpRecommendation::from_score(0.41), AmpRecommendation::Moderate);
        assert_eq!(AmpRecommendation::from_score(0.4), AmpRecommendation::Low);
    }
}
