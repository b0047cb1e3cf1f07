use crate::core::models::candidate::GeneratedCandidate;
use crate::core::models::sequence::Sequence;
use crate::engine::config::GeneratorConfig;
use crate::engine::error::EngineError;
use crate::engine::generator::{PropertyConstraint, SequenceGenerator};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::utils::sampling::{RandomSource, SeededRandom, derive_seed};
use rayon::prelude::*;
use std::ops::RangeInclusive;
use tracing::{info, instrument, warn};

/// One unit of generation work.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    Random {
        length: usize,
        count: usize,
        weighted: bool,
    },
    Constrained {
        length: usize,
        count: usize,
        constraint: PropertyConstraint,
    },
    Antimicrobial {
        length_range: RangeInclusive<usize>,
        count: usize,
    },
    Diverse {
        length: usize,
        count: usize,
    },
    TemplateVariants {
        template: Sequence,
        mutations: usize,
        positions: Option<Vec<usize>>,
        count: usize,
    },
}

impl GenerationRequest {
    pub fn count(&self) -> usize {
        match self {
            GenerationRequest::Random { count, .. }
            | GenerationRequest::Constrained { count, .. }
            | GenerationRequest::Antimicrobial { count, .. }
            | GenerationRequest::Diverse { count, .. }
            | GenerationRequest::TemplateVariants { count, .. } => *count,
        }
    }
}

fn repeat<R: RandomSource>(
    generator: &mut SequenceGenerator<R>,
    count: usize,
    reporter: &ProgressReporter,
    mut draw: impl FnMut(&mut SequenceGenerator<R>) -> Result<GeneratedCandidate, EngineError>,
) -> Result<Vec<GeneratedCandidate>, EngineError> {
    reporter.report(Progress::TaskStart {
        total_steps: count as u64,
    });
    let mut candidates = Vec::with_capacity(count);
    for _ in 0..count {
        candidates.push(draw(generator)?);
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    Ok(candidates)
}

/// Executes `request` with randomness drawn from `rng`.
#[instrument(skip_all, name = "generation_workflow", fields(count = request.count()))]
pub fn run<R: RandomSource>(
    request: &GenerationRequest,
    config: &GeneratorConfig,
    rng: R,
    reporter: &ProgressReporter,
) -> Result<Vec<GeneratedCandidate>, EngineError> {
    let mut generator = SequenceGenerator::new(config.clone(), rng)?;

    let candidates = reporter.phase("Generating", || -> Result<_, EngineError> {
        match request {
            GenerationRequest::Random {
                length,
                count,
                weighted,
            } => repeat(&mut generator, *count, reporter, |g| {
                g.generate_random_candidate(*length, *weighted)
            }),
            GenerationRequest::Constrained {
                length,
                count,
                constraint,
            } => repeat(&mut generator, *count, reporter, |g| {
                g.generate_with_constraint(*length, *constraint)
            }),
            GenerationRequest::Antimicrobial {
                length_range,
                count,
            } => generator.generate_antimicrobial_peptide(length_range.clone(), *count),
            GenerationRequest::Diverse { length, count } => {
                let set = generator.generate_diverse_set(*length, *count)?;
                if set.budget_exhausted() {
                    warn!(
                        exhausted_slots = set.exhausted_slots,
                        min_pairwise_distance = set.min_pairwise_distance,
                        "Diverse set falls short of the distance threshold."
                    );
                }
                Ok(set.candidates)
            }
            GenerationRequest::TemplateVariants {
                template,
                mutations,
                positions,
                count,
            } => repeat(&mut generator, *count, reporter, |g| {
                g.generate_template_variant(template, *mutations, positions.as_deref())
            }),
        }
    })?;

    info!(count = candidates.len(), "Generation finished.");
    Ok(candidates)
}

/// Executes independent requests in parallel.
///
/// Job `i` draws from its own [`SeededRandom`] seeded with
/// `derive_seed(base_seed, i)`, so results are reproducible for a given base
/// seed regardless of scheduling. Output order follows `requests`.
#[instrument(skip_all, name = "batch_generation_workflow", fields(jobs = requests.len()))]
pub fn run_batch(
    requests: &[GenerationRequest],
    config: &GeneratorConfig,
    base_seed: u64,
    reporter: &ProgressReporter,
) -> Result<Vec<Vec<GeneratedCandidate>>, EngineError> {
    reporter.report(Progress::TaskStart {
        total_steps: requests.len() as u64,
    });
    let silent = ProgressReporter::new();
    let results = requests
        .par_iter()
        .enumerate()
        .map(|(index, request)| {
            let rng = SeededRandom::new(derive_seed(base_seed, index as u64));
            let result = run(request, config, rng, &silent);
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect::<Result<Vec<_>, _>>();
    reporter.report(Progress::TaskFinish);
    results
}
