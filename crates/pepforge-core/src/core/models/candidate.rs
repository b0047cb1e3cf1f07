use super::sequence::Sequence;
use crate::core::descriptors::{charge, hydropathy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a candidate sequence was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMethod {
    Uniform,
    Weighted,
    Constrained,
    Antimicrobial,
    Diverse,
    TemplateVariant,
    /// Supplied by the caller rather than generated.
    External,
}

impl GenerationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationMethod::Uniform => "uniform",
            GenerationMethod::Weighted => "weighted",
            GenerationMethod::Constrained => "constrained",
            GenerationMethod::Antimicrobial => "antimicrobial",
            GenerationMethod::Diverse => "diverse",
            GenerationMethod::TemplateVariant => "template-variant",
            GenerationMethod::External => "external",
        }
    }
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown generation method: '{0}'")]
pub struct UnknownMethodError(pub String);

impl FromStr for GenerationMethod {
    type Err = UnknownMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "uniform" => Ok(GenerationMethod::Uniform),
            "weighted" => Ok(GenerationMethod::Weighted),
            "constrained" => Ok(GenerationMethod::Constrained),
            "antimicrobial" => Ok(GenerationMethod::Antimicrobial),
            "diverse" => Ok(GenerationMethod::Diverse),
            "template-variant" => Ok(GenerationMethod::TemplateVariant),
            "external" => Ok(GenerationMethod::External),
            other => Err(UnknownMethodError(other.to_string())),
        }
    }
}

/// A generated sequence with its provenance and summary attributes.
///
/// The summary values are computed once at construction and always agree
/// with the held sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCandidate {
    sequence: Sequence,
    method: GenerationMethod,
    constraints: String,
    net_charge: f64,
    mean_hydrophobicity: f64,
    hydrophobic_fraction: f64,
}

impl GeneratedCandidate {
    pub fn new(sequence: Sequence, method: GenerationMethod, constraints: impl Into<String>) -> Self {
        let net_charge = charge::net_charge(&sequence);
        let mean_hydrophobicity = hydropathy::mean_hydrophobicity(&sequence);
        let hydrophobic_fraction = hydropathy::hydrophobic_fraction(&sequence);
        Self {
            sequence,
            method,
            constraints: constraints.into(),
            net_charge,
            mean_hydrophobicity,
            hydrophobic_fraction,
        }
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn into_sequence(self) -> Sequence {
        self.sequence
    }

    pub fn method(&self) -> GenerationMethod {
        self.method
    }

    /// Human-readable rendering of the parameters the candidate was requested with.
    pub fn constraints(&self) -> &str {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn net_charge(&self) -> f64 {
        self.net_charge
    }

    pub fn mean_hydrophobicity(&self) -> f64 {
        self.mean_hydrophobicity
    }

    pub fn hydrophobic_fraction(&self) -> f64 {
        self.hydrophobic_fraction
    }
}
