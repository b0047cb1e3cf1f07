use super::config::{ConfigError, GeneratorConfig};
use super::error::{EngineError, ParameterError};
use super::utils::distance::{min_distance_to_set, min_pairwise_distance};
use super::utils::sampling::{RandomSource, SeededRandom};
use crate::core::descriptors::hydropathy::HELIX_ANGLE_DEGREES;
use crate::core::models::amino_acid::AminoAcid;
use crate::core::models::candidate::{GeneratedCandidate, GenerationMethod};
use crate::core::models::sequence::Sequence;
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::{debug, instrument, warn};

const UNIFORM_WEIGHTS: [f64; 20] = [1.0; 20];

const CATIONIC_POOL: &[AminoAcid] = &[AminoAcid::Lysine, AminoAcid::Arginine];
const HYDROPHOBIC_POOL: &[AminoAcid] = &[
    AminoAcid::Alanine,
    AminoAcid::Leucine,
    AminoAcid::Valine,
    AminoAcid::Isoleucine,
    AminoAcid::Phenylalanine,
    AminoAcid::Tryptophan,
    AminoAcid::Methionine,
];
const POLAR_POOL: &[AminoAcid] = &[
    AminoAcid::Serine,
    AminoAcid::Threonine,
    AminoAcid::Asparagine,
    AminoAcid::Glutamine,
    AminoAcid::Glycine,
];
const OTHER_POOL: &[AminoAcid] = &[
    AminoAcid::AsparticAcid,
    AminoAcid::GlutamicAcid,
    AminoAcid::Histidine,
    AminoAcid::Cysteine,
    AminoAcid::Proline,
    AminoAcid::Tyrosine,
];

/// Residue sets available to [`SequenceGenerator::generate_with_constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyConstraint {
    Hydrophobic,
    Hydrophilic,
    PositivelyCharged,
    NegativelyCharged,
    Polar,
    Aromatic,
    Small,
}

impl PropertyConstraint {
    pub fn members(self) -> &'static [AminoAcid] {
        use AminoAcid::*;
        match self {
            PropertyConstraint::Hydrophobic => &[
                Alanine,
                Valine,
                Isoleucine,
                Leucine,
                Methionine,
                Phenylalanine,
                Tyrosine,
                Tryptophan,
            ],
            PropertyConstraint::Hydrophilic => &[
                Arginine,
                Lysine,
                AsparticAcid,
                GlutamicAcid,
                Asparagine,
                Glutamine,
            ],
            PropertyConstraint::PositivelyCharged => &[Arginine, Lysine, Histidine],
            PropertyConstraint::NegativelyCharged => &[AsparticAcid, GlutamicAcid],
            PropertyConstraint::Polar => &[Serine, Threonine, Asparagine, Glutamine],
            PropertyConstraint::Aromatic => &[Phenylalanine, Tyrosine, Tryptophan],
            PropertyConstraint::Small => &[Alanine, Glycine, Serine],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PropertyConstraint::Hydrophobic => "hydrophobic",
            PropertyConstraint::Hydrophilic => "hydrophilic",
            PropertyConstraint::PositivelyCharged => "positively-charged",
            PropertyConstraint::NegativelyCharged => "negatively-charged",
            PropertyConstraint::Polar => "polar",
            PropertyConstraint::Aromatic => "aromatic",
            PropertyConstraint::Small => "small",
        }
    }
}

impl FromStr for PropertyConstraint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use PropertyConstraint::*;
        [
            Hydrophobic,
            Hydrophilic,
            PositivelyCharged,
            NegativelyCharged,
            Polar,
            Aromatic,
            Small,
        ]
        .into_iter()
        .find(|c| c.name() == s.trim().to_ascii_lowercase())
        .ok_or_else(|| ConfigError::InvalidValue {
            name: "constraint",
            reason: format!("unknown property constraint '{s}'"),
        })
    }
}

/// Result of diversity sampling.
#[derive(Debug, Clone)]
pub struct DiverseSet {
    pub candidates: Vec<GeneratedCandidate>,
    /// Slots filled with the best available candidate after the retry budget ran out.
    pub exhausted_slots: usize,
    /// Smallest pairwise distance within the set under the configured metric.
    pub min_pairwise_distance: f64,
}

impl DiverseSet {
    pub fn budget_exhausted(&self) -> bool {
        self.exhausted_slots > 0
    }

    pub fn sequences(&self) -> impl Iterator<Item = &Sequence> {
        self.candidates.iter().map(GeneratedCandidate::sequence)
    }
}

/// Produces random and constrained residue sequences.
///
/// The generator owns its [`RandomSource`]. Concurrent callers each build their own
/// generator, so no random state is ever shared between threads.
pub struct SequenceGenerator<R: RandomSource = SeededRandom> {
    config: GeneratorConfig,
    rng: R,
}

impl SequenceGenerator<SeededRandom> {
    pub fn with_seed(config: GeneratorConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, SeededRandom::new(seed))
    }
}

impl<R: RandomSource> SequenceGenerator<R> {
    pub fn new(config: GeneratorConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn seed(&mut self, value: u64) {
        self.rng.seed(value);
    }

    fn draw_from(&mut self, pool: &[AminoAcid]) -> Result<AminoAcid, EngineError> {
        Ok(pool[self.rng.sample_uniform(pool.len())?])
    }

    /// One sequence of exactly `length` residues over the full alphabet.
    ///
    /// With `weighted` set, residues follow natural abundance; otherwise every
    /// residue is equally likely.
    #[instrument(level = "trace", skip(self))]
    pub fn generate_random(&mut self, length: usize, weighted: bool) -> Result<Sequence, EngineError> {
        if length == 0 {
            return Err(ParameterError::ZeroLength.into());
        }
        let abundance = AminoAcid::abundance_weights();
        let weights: &[f64] = if weighted { &abundance } else { &UNIFORM_WEIGHTS };
        let residues = (0..length)
            .map(|_| self.rng.sample(weights).map(|i| AminoAcid::ALL[i]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Sequence::from_residues(residues)?)
    }

    pub fn generate_random_candidate(
        &mut self,
        length: usize,
        weighted: bool,
    ) -> Result<GeneratedCandidate, EngineError> {
        let sequence = self.generate_random(length, weighted)?;
        let method = if weighted {
            GenerationMethod::Weighted
        } else {
            GenerationMethod::Uniform
        };
        Ok(GeneratedCandidate::new(
            sequence,
            method,
            format!("length={length}"),
        ))
    }

    /// Uniform sampling restricted to the residues of one property set.
    pub fn generate_with_constraint(
        &mut self,
        length: usize,
        constraint: PropertyConstraint,
    ) -> Result<GeneratedCandidate, EngineError> {
        if length == 0 {
            return Err(ParameterError::ZeroLength.into());
        }
        let residues = (0..length)
            .map(|_| self.draw_from(constraint.members()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GeneratedCandidate::new(
            Sequence::from_residues(residues)?,
            GenerationMethod::Constrained,
            format!("length={length};constraint={}", constraint.name()),
        ))
    }

    fn amp_class_weights(&self, position: usize) -> [f64; 4] {
        let bias = &self.config.amp_bias;
        let phase = (HELIX_ANGLE_DEGREES.to_radians() * position as f64).cos();
        let p = bias.amphipathic_phasing;
        let modulated = [
            bias.cationic_weight * (1.0 - p * phase),
            bias.hydrophobic_weight * (1.0 + p * phase),
            bias.polar_weight,
            bias.other_weight,
        ];
        if modulated.iter().sum::<f64>() > 0.0 {
            modulated
        } else {
            [
                bias.cationic_weight,
                bias.hydrophobic_weight,
                bias.polar_weight,
                bias.other_weight,
            ]
        }
    }

    fn antimicrobial_sequence(&mut self, length: usize) -> Result<Sequence, EngineError> {
        const POOLS: [&[AminoAcid]; 4] = [CATIONIC_POOL, HYDROPHOBIC_POOL, POLAR_POOL, OTHER_POOL];
        let mut residues = Vec::with_capacity(length);
        for position in 0..length {
            let class = self.rng.sample(&self.amp_class_weights(position))?;
            residues.push(self.draw_from(POOLS[class])?);
        }
        Ok(Sequence::from_residues(residues)?)
    }

    /// Candidates biased toward the cationic, amphipathic signature of antimicrobial peptides.
    ///
    /// Each candidate's length is drawn uniformly from `length_range`.
    #[instrument(level = "debug", skip(self))]
    pub fn generate_antimicrobial_peptide(
        &mut self,
        length_range: RangeInclusive<usize>,
        num_sequences: usize,
    ) -> Result<Vec<GeneratedCandidate>, EngineError> {
        let (low, high) = (*length_range.start(), *length_range.end());
        if low == 0 || low > high {
            return Err(ParameterError::InvalidLengthRange { low, high }.into());
        }
        if num_sequences == 0 {
            return Err(ParameterError::ZeroCount.into());
        }

        let constraints = format!("length={low}..={high};target=antimicrobial");
        let mut peptides = Vec::with_capacity(num_sequences);
        for _ in 0..num_sequences {
            let length = self.rng.sample_in_range(low, high)?;
            let sequence = self.antimicrobial_sequence(length)?;
            peptides.push(GeneratedCandidate::new(
                sequence,
                GenerationMethod::Antimicrobial,
                constraints.clone(),
            ));
        }
        debug!(count = peptides.len(), "Generated antimicrobial peptide candidates.");
        Ok(peptides)
    }

    /// A set of mutually dissimilar sequences by rejection sampling.
    ///
    /// A draw is accepted when its distance to every accepted sequence reaches the
    /// configured threshold. Each slot gets at most `max_retries` draws; after that
    /// the draw farthest from the accepted set is taken, so the call always terminates.
    /// Every candidate's constraints end with `budget-exhausted=<bool>` for the set.
    #[instrument(level = "debug", skip(self))]
    pub fn generate_diverse_set(
        &mut self,
        length: usize,
        num_sequences: usize,
    ) -> Result<DiverseSet, EngineError> {
        if length == 0 {
            return Err(ParameterError::ZeroLength.into());
        }
        if num_sequences == 0 {
            return Err(ParameterError::ZeroCount.into());
        }

        let diversity = self.config.diversity.clone();
        let mut accepted: Vec<Sequence> = Vec::with_capacity(num_sequences);
        let mut exhausted_slots = 0;

        for slot in 0..num_sequences {
            let mut best: Option<(Sequence, f64)> = None;
            let mut placed = false;

            for _ in 0..diversity.max_retries {
                let candidate = self.generate_random(length, diversity.weighted)?;
                let distance = min_distance_to_set(diversity.metric, &candidate, &accepted);
                if distance >= diversity.min_distance {
                    accepted.push(candidate);
                    placed = true;
                    break;
                }
                if best.as_ref().is_none_or(|(_, d)| distance > *d) {
                    best = Some((candidate, distance));
                }
            }

            if !placed {
                let (candidate, distance) = best.ok_or_else(|| {
                    EngineError::Internal("diversity sampling made no draws".to_string())
                })?;
                warn!(
                    slot,
                    distance,
                    threshold = diversity.min_distance,
                    "Retry budget exhausted; accepting the most distant candidate found."
                );
                exhausted_slots += 1;
                accepted.push(candidate);
            }
        }

        let min_pairwise = min_pairwise_distance(diversity.metric, &accepted);
        let constraints = format!(
            "length={length};min-distance={};metric={:?};budget-exhausted={}",
            diversity.min_distance,
            diversity.metric,
            exhausted_slots > 0
        );
        let candidates = accepted
            .into_iter()
            .map(|s| GeneratedCandidate::new(s, GenerationMethod::Diverse, constraints.clone()))
            .collect();

        Ok(DiverseSet {
            candidates,
            exhausted_slots,
            min_pairwise_distance: min_pairwise,
        })
    }

    /// Point-mutates `template`.
    ///
    /// Explicit `positions` are mutated as given; otherwise `mutations` distinct
    /// positions are chosen at random. Each mutated position receives a residue
    /// different from the template's.
    pub fn generate_template_variant(
        &mut self,
        template: &Sequence,
        mutations: usize,
        positions: Option<&[usize]>,
    ) -> Result<GeneratedCandidate, EngineError> {
        let length = template.len();
        let positions: Vec<usize> = match positions {
            Some(given) => {
                if let Some(&position) = given.iter().find(|&&p| p >= length) {
                    return Err(ParameterError::PositionOutOfRange { position, length }.into());
                }
                given.to_vec()
            }
            None => {
                if mutations > length {
                    return Err(ParameterError::TooManyMutations {
                        requested: mutations,
                        length,
                    }
                    .into());
                }
                self.choose_distinct_positions(length, mutations)?
            }
        };

        let mut variant = template.clone();
        for &position in &positions {
            let current = variant[position];
            let alternatives: Vec<AminoAcid> =
                AminoAcid::ALL.into_iter().filter(|&aa| aa != current).collect();
            let replacement = self.draw_from(&alternatives)?;
            variant = variant.with_substitution(position, replacement).ok_or_else(|| {
                EngineError::Internal(format!("position {position} vanished during mutation"))
            })?;
        }

        Ok(GeneratedCandidate::new(
            variant,
            GenerationMethod::TemplateVariant,
            format!("template={template};mutations={}", positions.len()),
        ))
    }

    // Partial Fisher-Yates over 0..length.
    fn choose_distinct_positions(&mut self, length: usize, count: usize) -> Result<Vec<usize>, EngineError> {
        let mut pool: Vec<usize> = (0..length).collect();
        for i in 0..count {
            let j = i + self.rng.sample_uniform(length - i)?;
            pool.swap(i, j);
        }
        pool.truncate(count);
        Ok(pool)
    }
}
