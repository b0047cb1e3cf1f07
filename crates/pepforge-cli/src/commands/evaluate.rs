use crate::cli::EvaluateArgs;
use crate::commands::design::report_export;
use crate::config::builder::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use pepforge::core::models::candidate::{GeneratedCandidate, GenerationMethod};
use pepforge::core::models::design::Design;
use pepforge::core::models::evaluation::score;
use pepforge::core::models::sequence::Sequence;
use pepforge::engine::config::EvaluatorConfig;
use pepforge::engine::error::EngineError;
use pepforge::engine::exporter::read_artifact;
use pepforge::engine::progress::ProgressReporter;
use pepforge::workflows;
use std::path::Path;
use tracing::info;

const SEQUENCE_COLUMN_WIDTH: usize = 30;

fn fmt_score(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"))
}

fn abbreviate(sequence: &str) -> String {
    if sequence.len() <= SEQUENCE_COLUMN_WIDTH {
        sequence.to_string()
    } else {
        format!("{}...", &sequence[..SEQUENCE_COLUMN_WIDTH - 3])
    }
}

/// Renders designs as a fixed-width table, one row per design.
pub(crate) fn render_table(designs: &[Design]) -> String {
    let mut out = format!(
        "{:<12} {:<width$} {:>4} {:>7} {:>9} {:>10} {:>6}  {}\n",
        "ID",
        "SEQUENCE",
        "LEN",
        "CHARGE",
        "STABILITY",
        "SOLUBILITY",
        "AMP",
        "RECOMMENDATION",
        width = SEQUENCE_COLUMN_WIDTH,
    );
    for design in designs {
        let recommendation = design
            .evaluation()
            .amp_recommendation()
            .map_or_else(|| "-".to_string(), |r| r.to_string());
        out.push_str(&format!(
            "{:<12} {:<width$} {:>4} {:>7} {:>9} {:>10} {:>6}  {}\n",
            design.id(),
            abbreviate(&design.candidate().sequence().to_string()),
            design.candidate().len(),
            fmt_score(design.score(score::NET_CHARGE)),
            fmt_score(design.score(score::STABILITY)),
            fmt_score(design.score(score::SOLUBILITY)),
            fmt_score(design.score(score::AMP)),
            recommendation,
            width = SEQUENCE_COLUMN_WIDTH,
        ));
    }
    out
}

fn candidates_from_args(sequences: &[String]) -> Result<Vec<GeneratedCandidate>> {
    sequences
        .iter()
        .map(|s| -> Result<GeneratedCandidate> {
            let sequence = Sequence::parse(s).map_err(EngineError::from)?;
            Ok(GeneratedCandidate::new(sequence, GenerationMethod::External, ""))
        })
        .collect()
}

/// Loads an artifact and re-scores every design in it, keeping identifiers and provenance.
fn rescore_artifact(
    path: &Path,
    evaluator: &EvaluatorConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<Design>> {
    info!("Loading designs from {:?}", path);
    let records = read_artifact(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
    let candidates = records
        .into_iter()
        .map(|r| GeneratedCandidate::new(r.sequence, r.method, r.constraints))
        .collect();

    let scored = workflows::evaluate::run_designs(candidates, evaluator, "design", reporter)?;
    scored
        .into_iter()
        .zip(ids)
        .map(|(design, id)| {
            Design::new(id, design.candidate().clone(), design.evaluation().clone())
                .map_err(|e| CliError::from(EngineError::from(e)))
        })
        .collect()
}

pub async fn run(args: EvaluateArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(None, &args.output, &args.config)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let designs = tokio::task::block_in_place(|| -> Result<Vec<Design>> {
        match &args.input {
            Some(path) => rescore_artifact(path, &app.evaluator, &reporter),
            None => {
                let candidates = candidates_from_args(&args.sequences)?;
                Ok(workflows::evaluate::run_designs(
                    candidates,
                    &app.evaluator,
                    &app.prefix,
                    &reporter,
                )?)
            }
        }
    })?;

    print!("{}", render_table(&designs));

    if args.export {
        let outcome = tokio::task::block_in_place(|| {
            workflows::export::run(&designs, &app.prefix, &app.export, &reporter)
        })?;
        report_export(&outcome, app.export.formats.len())?;
    }
    Ok(())
}
