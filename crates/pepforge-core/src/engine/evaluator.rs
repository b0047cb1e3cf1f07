use super::config::{AmpWeights, ConfigError, EvaluatorConfig, SolubilityWeights, StabilityWeights};
use super::error::EngineError;
use crate::core::descriptors::charge::{
    charge_density, charge_uniformity, charged_fraction, isoelectric_point, net_charge,
};
use crate::core::descriptors::composition::{
    aromaticity, helix_propensity, instability_index, molecular_weight, rare_residue_fraction,
    sheet_propensity,
};
use crate::core::descriptors::hydropathy::{
    KYTE_DOOLITTLE_MAX, hydrophilicity, hydrophobic_fraction, hydrophobic_moment,
    mean_hydrophobicity,
};
use crate::core::models::design::Design;
use crate::core::models::evaluation::{EvaluationResult, score};
use crate::core::models::sequence::Sequence;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Linear falloff outside `[low, high]`: 1 inside, 0 once `falloff` away.
fn window_score(value: f64, low: f64, high: f64, falloff: f64) -> f64 {
    let distance = if value < low {
        low - value
    } else if value > high {
        value - high
    } else {
        0.0
    };
    (1.0 - distance / falloff).clamp(0.0, 1.0)
}

fn weighted_mean(terms: &[(f64, f64)]) -> f64 {
    let total: f64 = terms.iter().map(|(w, _)| w).sum();
    terms.iter().map(|(w, s)| w * s).sum::<f64>() / total
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Scores sequences with physicochemical descriptors and heuristic composites.
///
/// All scores are pure functions of the sequence and the configuration, so an
/// evaluator can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct SequenceEvaluator {
    config: EvaluatorConfig,
}

impl SequenceEvaluator {
    pub fn new(config: EvaluatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    fn stability_score(&self, seq: &Sequence) -> f64 {
        let w: &StabilityWeights = &self.config.stability;
        let composition = 1.0 - instability_index(seq) / 100.0;
        let hydropathy = window_score(
            mean_hydrophobicity(seq),
            w.hydropathy_low,
            w.hydropathy_high,
            w.hydropathy_falloff,
        );
        // Net formers of whichever secondary structure dominates, mapped to [0, 1].
        let structure = (helix_propensity(seq).max(sheet_propensity(seq)) + 1.0) / 2.0;
        let packing =
            (hydrophobic_moment(seq, self.config.moment_angle_degrees) / KYTE_DOOLITTLE_MAX).clamp(0.0, 1.0);

        weighted_mean(&[
            (w.composition, composition),
            (w.hydropathy, hydropathy),
            (w.structure_balance, structure),
            (w.charge_distribution, charge_uniformity(seq)),
            (w.amphipathic_packing, packing),
        ])
        .clamp(0.0, 1.0)
    }

    fn solubility_score(&self, seq: &Sequence) -> f64 {
        let w: &SolubilityWeights = &self.config.solubility;
        let density = window_score(
            charge_density(seq),
            w.charge_density_low,
            w.charge_density_high,
            w.charge_density_falloff,
        );
        let charged = window_score(
            charged_fraction(seq),
            w.charged_fraction_low,
            w.charged_fraction_high,
            w.charged_fraction_falloff,
        );

        weighted_mean(&[
            (w.charge_density, density),
            (w.hydrophilicity, hydrophilicity(seq)),
            (w.charged_fraction, charged),
        ])
        .clamp(0.0, 1.0)
    }

    fn amphipathicity(&self, seq: &Sequence) -> f64 {
        let ideal = self.config.amp.ideal_hydrophobic_fraction;
        let spread = ideal.max(1.0 - ideal);
        if spread <= 0.0 {
            return 1.0;
        }
        (1.0 - (hydrophobic_fraction(seq) - ideal).abs() / spread).clamp(0.0, 1.0)
    }

    fn amp_components(&self, seq: &Sequence) -> BTreeMap<String, f64> {
        let w: &AmpWeights = &self.config.amp;
        let charge = net_charge(seq);
        let moment = hydrophobic_moment(seq, self.config.moment_angle_degrees);
        let amphipathicity = self.amphipathicity(seq);

        let charge_term = logistic((charge - w.charge_midpoint) / w.charge_scale);
        let moment_term = (moment / KYTE_DOOLITTLE_MAX).clamp(0.0, 1.0);
        let length_term = window_score(
            seq.len() as f64,
            w.length_min as f64,
            w.length_max as f64,
            w.length_falloff,
        );
        let penalty = if rare_residue_fraction(seq) > w.rare_residue_limit {
            w.rare_residue_penalty
        } else {
            0.0
        };

        let amp = (weighted_mean(&[
            (w.charge, charge_term),
            (w.moment, moment_term),
            (w.amphipathicity, amphipathicity),
            (w.length, length_term),
        ]) - penalty)
            .clamp(0.0, 1.0);

        BTreeMap::from([
            (score::LENGTH.to_string(), seq.len() as f64),
            (score::NET_CHARGE.to_string(), charge),
            (score::HYDROPHOBICITY.to_string(), mean_hydrophobicity(seq)),
            (score::HYDROPHOBIC_MOMENT.to_string(), moment),
            (score::AMPHIPATHICITY.to_string(), amphipathicity),
            (score::AMP.to_string(), amp),
        ])
    }

    /// Full physicochemical profile of `seq`, including the composite
    /// stability, solubility and antimicrobial scores.
    #[instrument(level = "trace", skip_all, fields(len = seq.len()))]
    pub fn evaluate(&self, seq: &Sequence) -> EvaluationResult {
        let mut scores = self.amp_components(seq);
        scores.extend([
            (score::MOLECULAR_WEIGHT.to_string(), molecular_weight(seq)),
            (score::ISOELECTRIC_POINT.to_string(), isoelectric_point(seq)),
            (score::INSTABILITY_INDEX.to_string(), instability_index(seq)),
            (score::AROMATICITY.to_string(), aromaticity(seq)),
            (score::HELIX_PROPENSITY.to_string(), helix_propensity(seq)),
            (score::SHEET_PROPENSITY.to_string(), sheet_propensity(seq)),
            (score::STABILITY.to_string(), self.stability_score(seq)),
            (score::SOLUBILITY.to_string(), self.solubility_score(seq)),
        ]);
        EvaluationResult::new(seq.clone(), scores)
    }

    /// Parses `text` and evaluates it.
    pub fn evaluate_str(&self, text: &str) -> Result<EvaluationResult, EngineError> {
        let seq = Sequence::parse(text)?;
        Ok(self.evaluate(&seq))
    }

    /// Only the descriptors that feed the antimicrobial score, plus the score itself.
    pub fn evaluate_antimicrobial_potential(&self, seq: &Sequence) -> EvaluationResult {
        EvaluationResult::new(seq.clone(), self.amp_components(seq))
    }

    /// Evaluates every sequence in parallel. Output order matches input order.
    #[instrument(level = "debug", skip_all, fields(count = sequences.len()))]
    pub fn batch_evaluate(&self, sequences: &[Sequence]) -> Vec<EvaluationResult> {
        let results: Vec<EvaluationResult> =
            sequences.par_iter().map(|seq| self.evaluate(seq)).collect();
        debug!(count = results.len(), "Batch evaluation finished.");
        results
    }
}

/// Orders designs by the named score.
///
/// The sort is stable. Designs without the score are placed last regardless
/// of direction.
pub fn rank(mut designs: Vec<Design>, metric: &str, descending: bool) -> Vec<Design> {
    designs.sort_by(|a, b| match (a.score(metric), b.score(metric)) {
        (Some(x), Some(y)) => {
            if descending {
                y.total_cmp(&x)
            } else {
                x.total_cmp(&y)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    designs
}
