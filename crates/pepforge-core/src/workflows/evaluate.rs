use crate::core::models::candidate::GeneratedCandidate;
use crate::core::models::design::{Design, default_design_id};
use crate::core::models::evaluation::{AmpRecommendation, EvaluationResult};
use crate::engine::config::EvaluatorConfig;
use crate::engine::error::EngineError;
use crate::engine::evaluator::SequenceEvaluator;
use crate::engine::progress::ProgressReporter;
use tracing::{info, instrument};

/// A full evaluation together with its antimicrobial tier.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub evaluation: EvaluationResult,
    pub recommendation: AmpRecommendation,
}

/// Parses and scores a single sequence.
#[instrument(skip(config), name = "evaluation_workflow")]
pub fn run(sequence: &str, config: &EvaluatorConfig) -> Result<Assessment, EngineError> {
    let evaluator = SequenceEvaluator::new(config.clone())?;
    let evaluation = evaluator.evaluate_str(sequence)?;
    let recommendation = evaluation
        .amp_recommendation()
        .ok_or_else(|| EngineError::Internal("evaluation produced no amp_score".to_string()))?;
    Ok(Assessment {
        evaluation,
        recommendation,
    })
}

/// Scores `candidates` in parallel and pairs each with its evaluation.
///
/// Designs are identified as `<id_prefix>_001`, `<id_prefix>_002`, ... in input order.
#[instrument(skip_all, name = "design_evaluation_workflow", fields(count = candidates.len()))]
pub fn run_designs(
    candidates: Vec<GeneratedCandidate>,
    config: &EvaluatorConfig,
    id_prefix: &str,
    reporter: &ProgressReporter,
) -> Result<Vec<Design>, EngineError> {
    let evaluator = SequenceEvaluator::new(config.clone())?;
    let designs = reporter.phase("Evaluating", || {
        let sequences: Vec<_> = candidates.iter().map(|c| c.sequence().clone()).collect();
        let evaluations = evaluator.batch_evaluate(&sequences);
        candidates
            .into_iter()
            .zip(evaluations)
            .enumerate()
            .map(|(index, (candidate, evaluation))| {
                Design::new(default_design_id(id_prefix, index), candidate, evaluation)
                    .map_err(EngineError::from)
            })
            .collect::<Result<Vec<_>, _>>()
    })?;
    info!(count = designs.len(), "Evaluation finished.");
    Ok(designs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::candidate::GenerationMethod;
    use crate::core::models::evaluation::score;
    use crate::core::models::sequence::{Sequence, SequenceError};

    #[test]
    fn run_assesses_a_cationic_peptide_as_high_potential() {
        let assessment = run("KALKKKLLKALKKK", &EvaluatorConfig::default()).unwrap();
        assert_eq!(assessment.recommendation, AmpRecommendation::High);
        assert!(assessment.evaluation.get(score::NET_CHARGE).unwrap() > 0.0);
    }

    #[test]
    fn run_rejects_invalid_sequences() {
        assert!(matches!(
            run("X1Z", &EvaluatorConfig::default()),
            Err(EngineError::InvalidSequence(SequenceError::UnknownResidue { .. }))
        ));
    }

    #[test]
    fn run_designs_assigns_ids_and_keeps_order() {
        let candidates: Vec<_> = ["KALK", "DDDD", "GGGG"]
            .iter()
            .map(|s| {
                GeneratedCandidate::new(Sequence::parse(s).unwrap(), GenerationMethod::External, "")
            })
            .collect();
        let designs = run_designs(
            candidates,
            &EvaluatorConfig::default(),
            "pep",
            &ProgressReporter::new(),
        )
        .unwrap();
        let ids: Vec<_> = designs.iter().map(Design::id).collect();
        assert_eq!(ids, ["pep_001", "pep_002", "pep_003"]);
        assert_eq!(designs[1].candidate().sequence().to_string(), "DDDD");
        assert!(designs.iter().all(|d| d.evaluation().amp_score().is_some()));
    }
}
