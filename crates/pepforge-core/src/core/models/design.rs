use super::candidate::GeneratedCandidate;
use super::evaluation::EvaluationResult;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Evaluation for '{evaluated}' does not belong to candidate '{candidate}'")]
pub struct MismatchedDesignError {
    pub candidate: String,
    pub evaluated: String,
}

/// A scored candidate: the unit that gets ranked and exported.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    id: String,
    candidate: GeneratedCandidate,
    evaluation: EvaluationResult,
}

impl Design {
    pub fn new(
        id: impl Into<String>,
        candidate: GeneratedCandidate,
        evaluation: EvaluationResult,
    ) -> Result<Self, MismatchedDesignError> {
        if candidate.sequence() != evaluation.sequence() {
            return Err(MismatchedDesignError {
                candidate: candidate.sequence().to_string(),
                evaluated: evaluation.sequence().to_string(),
            });
        }
        Ok(Self {
            id: id.into(),
            candidate,
            evaluation,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn candidate(&self) -> &GeneratedCandidate {
        &self.candidate
    }

    pub fn evaluation(&self) -> &EvaluationResult {
        &self.evaluation
    }

    /// Looks up a score by name; `None` if the evaluator did not produce it.
    pub fn score(&self, name: &str) -> Option<f64> {
        self.evaluation.get(name)
    }
}

/// Builds the default identifier for the `index`-th design (zero based).
pub fn default_design_id(prefix: &str, index: usize) -> String {
    format!("{}_{:03}", prefix, index + 1)
}
