use crate::core::models::design::Design;
use crate::engine::config::ExportConfig;
use crate::engine::error::EngineError;
use crate::engine::exporter::{DesignExporter, ExportOutcome};
use crate::engine::progress::ProgressReporter;
use tracing::instrument;

/// Writes `designs` in every format listed in `config`.
///
/// Per-format failures are collected in the returned [`ExportOutcome`]; only
/// problems that prevent any artifact from being attempted become an error.
#[instrument(skip_all, name = "export_workflow", fields(prefix = prefix))]
pub fn run(
    designs: &[Design],
    prefix: &str,
    config: &ExportConfig,
    reporter: &ProgressReporter,
) -> Result<ExportOutcome, EngineError> {
    let exporter = DesignExporter::new(config.clone());
    let outcome = reporter.phase("Exporting", || exporter.export_all(designs, prefix, reporter))?;
    Ok(outcome)
}
