use super::config::{ExportConfig, ExportFormat};
use super::progress::{Progress, ProgressReporter};
use crate::core::io::csv::CsvFile;
use crate::core::io::error::ExportError;
use crate::core::io::fasta::{FastaFile, FastaOptions};
use crate::core::io::json::JsonFile;
use crate::core::io::record::DesignRecord;
use crate::core::io::report::write_report;
use crate::core::io::sink::{ArtifactSink, TempFileSink};
use crate::core::io::traits::DesignFile;
use crate::core::models::design::Design;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

/// Per-format result of an export.
///
/// A failure in one format never discards the artifacts already written for
/// the others.
#[derive(Debug, Default)]
pub struct ExportOutcome {
    pub written: BTreeMap<ExportFormat, PathBuf>,
    pub failed: BTreeMap<ExportFormat, ExportError>,
}

impl ExportOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

fn validate_prefix(prefix: &str) -> Result<(), ExportError> {
    let valid = !prefix.trim().is_empty()
        && prefix != "."
        && prefix != ".."
        && !prefix.contains(['/', '\\']);
    if valid {
        Ok(())
    } else {
        Err(ExportError::InvalidPrefix(prefix.to_string()))
    }
}

pub struct DesignExporter<S: ArtifactSink = TempFileSink> {
    config: ExportConfig,
    sink: S,
}

impl DesignExporter<TempFileSink> {
    pub fn new(config: ExportConfig) -> Self {
        Self::with_sink(config, TempFileSink)
    }
}

impl<S: ArtifactSink> DesignExporter<S> {
    pub fn with_sink(config: ExportConfig, sink: S) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Final location of the `format` artifact for `prefix`.
    pub fn artifact_path(&self, prefix: &str, format: ExportFormat) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{prefix}{}", format.file_suffix()))
    }

    fn prepare_output_dir(&self) -> Result<(), ExportError> {
        let dir = &self.config.output_dir;
        std::fs::create_dir_all(dir).map_err(|e| ExportError::at_path(dir, e))?;
        NamedTempFile::new_in(dir)
            .map(drop)
            .map_err(|e| ExportError::at_path(dir, e))
    }

    fn write_artifact(
        &self,
        format: ExportFormat,
        records: &[DesignRecord],
        prefix: &str,
    ) -> Result<PathBuf, ExportError> {
        let mut handle = self.sink.open_for_write(&self.artifact_path(prefix, format))?;
        match format {
            ExportFormat::Csv => CsvFile::write_to(records, &(), &mut handle)?,
            ExportFormat::Json => JsonFile::write_to(records, &(), &mut handle)?,
            ExportFormat::Fasta => {
                let options = FastaOptions {
                    line_width: self.config.fasta_line_width,
                };
                FastaFile::write_to(records, &options, &mut handle)?
            }
            ExportFormat::Report => write_report(records, prefix, &mut handle)?,
        }
        handle.flush()?;
        self.sink.finalize(handle)
    }

    /// Writes every configured format for `designs` under the output directory.
    ///
    /// Artifacts are named `<prefix><suffix>` (see [`ExportFormat::file_suffix`]).
    /// Returns an error only when nothing can be attempted: no designs, a bad
    /// prefix, or an output directory that cannot be created or written.
    #[instrument(skip_all, name = "export_all", fields(prefix = prefix, count = designs.len()))]
    pub fn export_all(
        &self,
        designs: &[Design],
        prefix: &str,
        reporter: &ProgressReporter,
    ) -> Result<ExportOutcome, ExportError> {
        if designs.is_empty() {
            return Err(ExportError::NoDesigns);
        }
        validate_prefix(prefix)?;
        self.prepare_output_dir()?;

        let records: Vec<DesignRecord> = designs.iter().map(DesignRecord::from).collect();
        let mut outcome = ExportOutcome::default();

        reporter.report(Progress::TaskStart {
            total_steps: self.config.formats.len() as u64,
        });
        for &format in &self.config.formats {
            match self.write_artifact(format, &records, prefix) {
                Ok(path) => {
                    debug!(%format, path = %path.display(), "Artifact written.");
                    reporter.report(Progress::ArtifactWritten {
                        format,
                        path: path.clone(),
                    });
                    outcome.written.insert(format, path);
                }
                Err(e) => {
                    warn!(%format, error = %e, "Failed to write artifact.");
                    outcome.failed.insert(format, e);
                }
            }
            reporter.report(Progress::TaskIncrement);
        }
        reporter.report(Progress::TaskFinish);

        info!(
            written = outcome.written.len(),
            failed = outcome.failed.len(),
            "Export finished."
        );
        Ok(outcome)
    }
}

/// Infers an artifact format from a file extension.
pub fn format_for_path(path: &Path) -> Option<ExportFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some(ExportFormat::Csv),
        "json" => Some(ExportFormat::Json),
        "fasta" | "fa" | "faa" => Some(ExportFormat::Fasta),
        _ => None,
    }
}

/// Reads a CSV, JSON or FASTA artifact back into records.
pub fn read_artifact(path: &Path) -> Result<Vec<DesignRecord>, ExportError> {
    match format_for_path(path) {
        Some(ExportFormat::Csv) => CsvFile::read_from_path(path),
        Some(ExportFormat::Json) => JsonFile::read_from_path(path),
        Some(ExportFormat::Fasta) => FastaFile::read_from_path(path),
        _ => Err(ExportError::Parse {
            format: "artifact",
            line: 0,
            reason: format!("cannot infer a readable format from '{}'", path.display()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::candidate::{GeneratedCandidate, GenerationMethod};
    use crate::core::models::design::default_design_id;
    use crate::core::models::sequence::Sequence;
    use crate::engine::config::ExportConfigBuilder;
    use crate::engine::evaluator::SequenceEvaluator;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    const TOLERANCE: f64 = 1e-6;

    fn designs() -> Vec<Design> {
        let evaluator = SequenceEvaluator::default();
        ["KALKKKLLKALKKK", "DDDDDDDDDDDDDD", "GIGKFLHSAKKFGKAFVGEIMNS"]
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let seq = Sequence::parse(text).unwrap();
                let evaluation = evaluator.evaluate(&seq);
                let candidate = GeneratedCandidate::new(seq, GenerationMethod::External, "");
                Design::new(default_design_id("amp", i), candidate, evaluation).unwrap()
            })
            .collect()
    }

    fn exporter(dir: &Path) -> DesignExporter {
        DesignExporter::new(
            ExportConfigBuilder::new()
                .output_dir(dir.to_path_buf())
                .build()
                .unwrap(),
        )
    }

    fn assert_round_trip(original: &[Design], parsed: &[DesignRecord]) {
        assert_eq!(parsed.len(), original.len());
        for (design, record) in original.iter().zip(parsed) {
            assert_eq!(record.id, design.id());
            assert_eq!(&record.sequence, design.candidate().sequence());
            let scores = design.evaluation().scores();
            assert_eq!(record.scores.len(), scores.len());
            for (name, value) in scores {
                let read = record.scores[name];
                assert!((read - value).abs() <= TOLERANCE, "{name}: {read} vs {value}");
            }
        }
    }

    #[test]
    fn export_all_writes_every_format_with_prefix_naming() {
        let dir = tempdir().unwrap();
        let outcome = exporter(dir.path())
            .export_all(&designs(), "amp", &ProgressReporter::new())
            .unwrap();
        assert!(outcome.is_complete());
        assert_eq!(outcome.written.len(), 4);
        for (format, name) in [
            (ExportFormat::Csv, "amp.csv"),
            (ExportFormat::Json, "amp.json"),
            (ExportFormat::Fasta, "amp.fasta"),
            (ExportFormat::Report, "amp_report.md"),
        ] {
            assert_eq!(outcome.written[&format], dir.path().join(name));
            assert!(dir.path().join(name).is_file());
        }
    }

    #[test]
    fn artifacts_round_trip_sequences_and_scores() {
        let dir = tempdir().unwrap();
        let originals = designs();
        let outcome = exporter(dir.path())
            .export_all(&originals, "rt", &ProgressReporter::new())
            .unwrap();
        for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Fasta] {
            let parsed = read_artifact(&outcome.written[&format]).unwrap();
            assert_round_trip(&originals, &parsed);
        }
    }

    #[test]
    fn identifiers_with_spaces_survive_every_format() {
        let dir = tempdir().unwrap();
        let evaluator = SequenceEvaluator::default();
        let seq = Sequence::parse("KALKKKLLKALKKK").unwrap();
        let evaluation = evaluator.evaluate(&seq);
        let candidate = GeneratedCandidate::new(seq, GenerationMethod::External, "");
        let originals =
            vec![Design::new(default_design_id("my run", 0), candidate, evaluation).unwrap()];

        let outcome = exporter(dir.path())
            .export_all(&originals, "my run", &ProgressReporter::new())
            .unwrap();
        assert!(outcome.is_complete());
        for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Fasta] {
            let parsed = read_artifact(&outcome.written[&format]).unwrap();
            assert_eq!(parsed[0].id, "my run_001");
            assert_round_trip(&originals, &parsed);
        }
    }

    #[test]
    fn empty_design_set_is_rejected() {
        let dir = tempdir().unwrap();
        let err = exporter(dir.path())
            .export_all(&[], "none", &ProgressReporter::new())
            .unwrap_err();
        assert!(matches!(err, ExportError::NoDesigns));
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn path_like_prefixes_are_rejected() {
        let dir = tempdir().unwrap();
        for prefix in ["", "../escape", "a/b", ".."] {
            assert!(matches!(
                exporter(dir.path()).export_all(&designs(), prefix, &ProgressReporter::new()),
                Err(ExportError::InvalidPrefix(_))
            ));
        }
    }

    #[test]
    fn missing_output_directory_is_created() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("runs").join("first");
        let outcome = exporter(&nested)
            .export_all(&designs(), "amp", &ProgressReporter::new())
            .unwrap();
        assert!(outcome.is_complete());
        assert!(nested.join("amp.json").is_file());
    }

    #[test]
    fn unwritable_output_location_is_an_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not_a_dir");
        fs::write(&file, "").unwrap();
        assert!(matches!(
            exporter(&file).export_all(&designs(), "amp", &ProgressReporter::new()),
            Err(ExportError::Io { .. })
        ));
    }

    #[test]
    fn one_failing_format_does_not_discard_the_others() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("amp.json")).unwrap();

        let outcome = exporter(dir.path())
            .export_all(&designs(), "amp", &ProgressReporter::new())
            .unwrap();
        assert!(!outcome.is_complete());
        assert!(outcome.failed.contains_key(&ExportFormat::Json));
        assert_eq!(outcome.written.len(), 3);
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "staging files left: {leftovers:?}");
    }

    #[test]
    fn selected_formats_only_are_written() {
        let dir = tempdir().unwrap();
        let exporter = DesignExporter::new(
            ExportConfigBuilder::new()
                .output_dir(dir.path().to_path_buf())
                .formats(vec![ExportFormat::Fasta])
                .fasta_line_width(5)
                .build()
                .unwrap(),
        );
        let outcome = exporter
            .export_all(&designs(), "only", &ProgressReporter::new())
            .unwrap();
        assert_eq!(outcome.written.keys().copied().collect::<Vec<_>>(), [ExportFormat::Fasta]);
        let text = fs::read_to_string(dir.path().join("only.fasta")).unwrap();
        assert!(text.lines().filter(|l| !l.starts_with('>')).all(|l| l.len() <= 5));
    }

    #[test]
    fn progress_reports_each_written_artifact() {
        let dir = tempdir().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::ArtifactWritten { format, .. } = event {
                sink.lock().unwrap().push(format);
            }
        }));
        exporter(dir.path())
            .export_all(&designs(), "amp", &reporter)
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), ExportFormat::ALL.to_vec());
    }

    #[test]
    fn format_is_inferred_from_extension() {
        assert_eq!(format_for_path(Path::new("a/b.CSV")), Some(ExportFormat::Csv));
        assert_eq!(format_for_path(Path::new("x.fa")), Some(ExportFormat::Fasta));
        assert_eq!(format_for_path(Path::new("x_report.md")), None);
        assert!(read_artifact(Path::new("x.txt")).is_err());
    }
}
