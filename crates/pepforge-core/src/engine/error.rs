use thiserror::Error;

use super::config::ConfigError;
use super::utils::sampling::SamplingError;
use crate::core::io::error::ExportError;
use crate::core::models::design::MismatchedDesignError;
use crate::core::models::sequence::SequenceError;

/// Malformed length, count or range arguments. Caller errors; never retried.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParameterError {
    #[error("Sequence length must be at least 1")]
    ZeroLength,

    #[error("Invalid length range {low}..={high}: bounds must satisfy 1 <= low <= high")]
    InvalidLengthRange { low: usize, high: usize },

    #[error("Number of sequences must be at least 1")]
    ZeroCount,

    #[error("Mutation position {position} is outside the template (length {length})")]
    PositionOutOfRange { position: usize, length: usize },

    #[error("Cannot place {requested} distinct mutations in a template of length {length}")]
    TooManyMutations { requested: usize, length: usize },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    #[error("Invalid sequence: {0}")]
    InvalidSequence(#[from] SequenceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Random sampling failed: {0}")]
    Sampling(#[from] SamplingError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error(transparent)]
    MismatchedDesign(#[from] MismatchedDesignError),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
