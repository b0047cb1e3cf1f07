use crate::cli::{GenerateArgs, GenerationArgs, GenerationMode, OutputArgs};
use crate::config::builder::build_config;
use crate::config::models::GenerationSettings;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use pepforge::core::io::error::ExportError;
use pepforge::core::io::fasta::{FastaFile, FastaOptions};
use pepforge::core::io::record::DesignRecord;
use pepforge::core::io::sink::{ArtifactSink, TempFileSink};
use pepforge::core::io::traits::DesignFile;
use pepforge::core::models::candidate::GeneratedCandidate;
use pepforge::core::models::design::default_design_id;
use pepforge::core::models::evaluation::score;
use pepforge::core::models::sequence::Sequence;
use pepforge::engine::error::EngineError;
use pepforge::engine::progress::ProgressReporter;
use pepforge::engine::utils::sampling::SeededRandom;
use pepforge::workflows::generate::GenerationRequest;
use pepforge::workflows;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Translates the chosen mode and resolved sizes into a library request.
pub(crate) fn build_request(
    args: &GenerationArgs,
    settings: &GenerationSettings,
) -> Result<GenerationRequest> {
    let GenerationSettings {
        count,
        length,
        length_range: (low, high),
        mutations,
    } = *settings;

    let request = match args.mode {
        GenerationMode::Random | GenerationMode::Uniform => GenerationRequest::Random {
            length,
            count,
            weighted: args.mode == GenerationMode::Random,
        },
        GenerationMode::Constrained => {
            let constraint = args.constraint.ok_or_else(|| {
                CliError::Argument("'--constraint' is required in constrained mode".to_string())
            })?;
            GenerationRequest::Constrained {
                length,
                count,
                constraint,
            }
        }
        GenerationMode::Amp => GenerationRequest::Antimicrobial {
            length_range: low..=high,
            count,
        },
        GenerationMode::Diverse => GenerationRequest::Diverse { length, count },
        GenerationMode::Variant => {
            let text = args.template.as_deref().ok_or_else(|| {
                CliError::Argument("'--template' is required in variant mode".to_string())
            })?;
            let template = Sequence::parse(text).map_err(EngineError::from)?;
            GenerationRequest::TemplateVariants {
                template,
                mutations,
                positions: args.positions.clone(),
                count,
            }
        }
    };
    Ok(request)
}

pub(crate) fn random_source(seed: Option<u64>) -> SeededRandom {
    match seed {
        Some(seed) => {
            info!("Using fixed seed {}.", seed);
            SeededRandom::new(seed)
        }
        None => SeededRandom::from_entropy(),
    }
}

/// Unscored record carrying the summary attributes computed at generation time.
fn candidate_record(id: String, candidate: &GeneratedCandidate) -> DesignRecord {
    let scores = BTreeMap::from([
        (score::LENGTH.to_string(), candidate.len() as f64),
        (score::NET_CHARGE.to_string(), candidate.net_charge()),
        (score::HYDROPHOBICITY.to_string(), candidate.mean_hydrophobicity()),
        ("hydrophobic_fraction".to_string(), candidate.hydrophobic_fraction()),
    ]);
    DesignRecord {
        id,
        sequence: candidate.sequence().clone(),
        method: candidate.method(),
        constraints: candidate.constraints().to_string(),
        scores,
    }
}

/// Writes `records` to `path` through a staging file, so a failed write never
/// leaves a truncated FASTA at `path`.
fn write_fasta(
    records: &[DesignRecord],
    options: &FastaOptions,
    path: &Path,
) -> std::result::Result<PathBuf, ExportError> {
    let sink = TempFileSink;
    let mut handle = sink.open_for_write(path)?;
    FastaFile::write_to(records, options, &mut handle)?;
    handle.flush()?;
    sink.finalize(handle)
}

pub async fn run(args: GenerateArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(Some(&args.generation), &OutputArgs::default(), &args.config)?;
    let request = build_request(&args.generation, &app.generation)?;
    let rng = random_source(app.seed);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core generation workflow...");
    let candidates = tokio::task::block_in_place(|| {
        workflows::generate::run(&request, &app.generator, rng, &reporter)
    })?;

    let records: Vec<DesignRecord> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| candidate_record(default_design_id(&app.prefix, i), c))
        .collect();
    let options = FastaOptions {
        line_width: app.export.fasta_line_width,
    };

    match &args.output {
        Some(path) => {
            let written = write_fasta(&records, &options, path)?;
            println!(
                "✓ {} sequence(s) written to: {}",
                records.len(),
                written.display()
            );
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            FastaFile::write_to(&records, &options, &mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}
