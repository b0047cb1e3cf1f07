use crate::cli::DesignArgs;
use crate::commands::evaluate::render_table;
use crate::commands::generate::{build_request, random_source};
use crate::config::builder::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use pepforge::engine::evaluator::rank;
use pepforge::engine::exporter::ExportOutcome;
use pepforge::engine::progress::ProgressReporter;
use pepforge::workflows;
use tracing::{error, info, warn};

const PREVIEW_ROWS: usize = 10;

/// Prints the outcome of an export and turns any per-format failure into an error.
///
/// Artifacts that were written are kept and listed even when others failed.
pub(crate) fn report_export(outcome: &ExportOutcome, attempted: usize) -> Result<()> {
    if let Some(dir) = outcome.written.values().next().and_then(|p| p.parent()) {
        println!(
            "✓ {} artifact(s) written to: {}",
            outcome.written.len(),
            dir.display()
        );
    }
    for (format, err) in &outcome.failed {
        error!("Failed to write {} artifact: {}", format, err);
        eprintln!("✗ {format}: {err}");
    }
    if outcome.is_complete() {
        Ok(())
    } else {
        Err(CliError::PartialExport {
            failed: outcome.failed.len(),
            attempted,
        })
    }
}

pub async fn run(args: DesignArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(Some(&args.generation), &args.output, &args.config)?;
    let request = build_request(&args.generation, &app.generation)?;
    let rng = random_source(app.seed);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting design run ({} candidate(s))...", request.count());
    let designs = tokio::task::block_in_place(|| -> Result<_> {
        let candidates = workflows::generate::run(&request, &app.generator, rng, &reporter)?;
        let designs =
            workflows::evaluate::run_designs(candidates, &app.evaluator, &app.prefix, &reporter)?;
        Ok(designs)
    })?;

    if designs
        .first()
        .is_some_and(|d| d.score(&args.rank_by).is_none())
    {
        return Err(CliError::Argument(format!(
            "Unknown score '{}' for --rank-by",
            args.rank_by
        )));
    }

    let mut ranked = rank(designs, &args.rank_by, true);
    if let Some(top) = args.top {
        if top < ranked.len() {
            info!("Keeping the top {} of {} design(s).", top, ranked.len());
            ranked.truncate(top);
        }
    }
    if ranked.is_empty() {
        warn!("Design run produced no designs to export.");
        println!("Warning: no designs to export.");
        return Ok(());
    }

    let preview = &ranked[..ranked.len().min(PREVIEW_ROWS)];
    println!("Top designs by {}:", args.rank_by);
    print!("{}", render_table(preview));

    info!("Invoking the core export workflow...");
    let outcome = tokio::task::block_in_place(|| {
        workflows::export::run(&ranked, &app.prefix, &app.export, &reporter)
    })?;
    report_export(&outcome, app.export.formats.len())
}
