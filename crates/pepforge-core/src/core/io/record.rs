use crate::core::models::candidate::{GeneratedCandidate, GenerationMethod};
use crate::core::models::design::{Design, MismatchedDesignError};
use crate::core::models::evaluation::EvaluationResult;
use crate::core::models::sequence::Sequence;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Flat, format-neutral view of a [`Design`] as stored in an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignRecord {
    pub id: String,
    pub sequence: Sequence,
    pub method: GenerationMethod,
    #[serde(default)]
    pub constraints: String,
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
}

impl From<&Design> for DesignRecord {
    fn from(design: &Design) -> Self {
        Self {
            id: design.id().to_string(),
            sequence: design.candidate().sequence().clone(),
            method: design.candidate().method(),
            constraints: design.candidate().constraints().to_string(),
            scores: design.evaluation().scores().clone(),
        }
    }
}

impl DesignRecord {
    /// Rebuilds the design this record was written from.
    pub fn into_design(self) -> Result<Design, MismatchedDesignError> {
        let evaluation = EvaluationResult::new(self.sequence.clone(), self.scores);
        let candidate = GeneratedCandidate::new(self.sequence, self.method, self.constraints);
        Design::new(self.id, candidate, evaluation)
    }
}

/// Sorted union of score names across `records`.
pub(crate) fn score_columns(records: &[DesignRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.scores.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
