use rand::rngs::StdRng;
use rand::{distributions::WeightedIndex, prelude::*};
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SamplingError {
    #[error("Input weights list is empty, cannot perform sampling")]
    EmptyWeights,
    #[error("Invalid range {low}..={high}: lower bound exceeds upper bound")]
    InvertedRange { low: usize, high: usize },
    #[error("Failed to create weighted distribution: {source}")]
    DistributionError {
        #[from]
        source: rand::distributions::WeightedError,
    },
}

/// An injectable source of randomness.
///
/// Generators never touch a global RNG; every draw goes through the source they
/// were constructed with, so a fixed seed reproduces a run exactly.
pub trait RandomSource {
    /// Resets the source to a deterministic state derived from `value`.
    fn seed(&mut self, value: u64);

    /// Draws an index with probability proportional to `weights[index]`.
    fn sample(&mut self, weights: &[f64]) -> Result<usize, SamplingError>;

    /// Draws an index uniformly from `0..len`.
    fn sample_uniform(&mut self, len: usize) -> Result<usize, SamplingError> {
        if len == 0 {
            return Err(SamplingError::EmptyWeights);
        }
        self.sample(&vec![1.0; len])
    }

    /// Draws a value uniformly from the closed interval `low..=high`.
    fn sample_in_range(&mut self, low: usize, high: usize) -> Result<usize, SamplingError> {
        if low > high {
            return Err(SamplingError::InvertedRange { low, high });
        }
        Ok(low + self.sample_uniform(high - low + 1)?)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn seed(&mut self, value: u64) {
        (**self).seed(value)
    }

    fn sample(&mut self, weights: &[f64]) -> Result<usize, SamplingError> {
        (**self).sample(weights)
    }

    fn sample_uniform(&mut self, len: usize) -> Result<usize, SamplingError> {
        (**self).sample_uniform(len)
    }

    fn sample_in_range(&mut self, low: usize, high: usize) -> Result<usize, SamplingError> {
        (**self).sample_in_range(low, high)
    }
}

/// The default [`RandomSource`], backed by a seedable [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A non-reproducible source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn seed(&mut self, value: u64) {
        self.rng = StdRng::seed_from_u64(value);
    }

    #[instrument(level = "trace", skip_all, fields(n = weights.len()))]
    fn sample(&mut self, weights: &[f64]) -> Result<usize, SamplingError> {
        if weights.is_empty() {
            return Err(SamplingError::EmptyWeights);
        }
        let dist = WeightedIndex::new(weights)?;
        Ok(dist.sample(&mut self.rng))
    }

    fn sample_uniform(&mut self, len: usize) -> Result<usize, SamplingError> {
        if len == 0 {
            return Err(SamplingError::EmptyWeights);
        }
        Ok(self.rng.gen_range(0..len))
    }
}

/// Derives an independent per-job seed from a base seed (SplitMix64 finalizer).
pub fn derive_seed(base: u64, index: u64) -> u64 {
    let mut z = base
        .wrapping_add(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(index.wrapping_mul(0xBF58_476D_1CE4_E5B9));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
