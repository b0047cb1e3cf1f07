use crate::utils::parser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pepforge::engine::config::ExportFormat;
use pepforge::engine::generator::PropertyConstraint;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "PepForge CLI - generate, score and export peptide sequence designs.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel evaluation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate candidate sequences and print them as FASTA.
    Generate(GenerateArgs),
    /// Score sequences given on the command line or read from an artifact.
    Evaluate(EvaluateArgs),
    /// Generate, score, rank and export a batch of designs.
    Design(DesignArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Natural-abundance weighted residues.
    Random,
    /// Every residue equally likely.
    Uniform,
    /// Residues restricted to one property set (see --constraint).
    Constrained,
    /// Cationic, amphipathic antimicrobial-like peptides.
    Amp,
    /// Mutually dissimilar sequences.
    Diverse,
    /// Point mutants of a template (see --template).
    Variant,
}

/// Options shared by every command that reads configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a TOML configuration file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S generator.diversity.min-distance=0.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct GenerationArgs {
    /// Generation strategy.
    #[arg(short, long, value_enum, default_value_t = GenerationMode::Amp)]
    pub mode: GenerationMode,

    /// Number of sequences to generate.
    #[arg(short = 'n', long, value_name = "INT")]
    pub count: Option<usize>,

    /// Exact sequence length (random, uniform, constrained and diverse modes).
    #[arg(short = 'L', long, value_name = "INT")]
    pub length: Option<usize>,

    /// Length range for antimicrobial peptides, e.g. '10-30'.
    #[arg(long, value_name = "MIN-MAX", value_parser = parser::parse_length_range)]
    pub length_range: Option<(usize, usize)>,

    /// Residue property set for constrained generation.
    #[arg(long, value_name = "NAME", value_parser = parser::parse_constraint)]
    pub constraint: Option<PropertyConstraint>,

    /// Template sequence for variant generation.
    #[arg(long, value_name = "SEQUENCE")]
    pub template: Option<String>,

    /// Number of random point mutations per variant.
    #[arg(long, value_name = "INT")]
    pub mutations: Option<usize>,

    /// Explicit zero-based positions to mutate, comma separated.
    #[arg(long, value_name = "POS,...", value_delimiter = ',')]
    pub positions: Option<Vec<usize>>,

    /// Seed for reproducible output. Unseeded runs draw from OS entropy.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,
}

/// Where and how designs are written.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output directory for exported artifacts.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name prefix for exported artifacts and design identifiers.
    #[arg(short, long, value_name = "NAME")]
    pub prefix: Option<String>,

    /// Export formats, comma separated. Defaults to all formats.
    #[arg(short, long, value_name = "FORMAT,...", value_delimiter = ',', value_parser = parser::parse_format)]
    pub formats: Option<Vec<ExportFormat>>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub generation: GenerationArgs,

    /// Write FASTA to this file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Sequences to score (one-letter codes).
    #[arg(value_name = "SEQUENCE", required_unless_present = "input")]
    pub sequences: Vec<String>,

    /// Read designs from a CSV, JSON or FASTA artifact.
    #[arg(short, long, value_name = "PATH", conflicts_with = "sequences")]
    pub input: Option<PathBuf>,

    /// Also export the scored designs.
    #[arg(long)]
    pub export: bool,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args, Debug)]
pub struct DesignArgs {
    #[command(flatten)]
    pub generation: GenerationArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Score used to rank designs (highest first).
    #[arg(long, value_name = "SCORE", default_value = "amp_score")]
    pub rank_by: String,

    /// Keep only the best N designs after ranking.
    #[arg(long, value_name = "INT")]
    pub top: Option<usize>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn design_command_parses_full_option_set() {
        let cli = Cli::try_parse_from([
            "pepforge",
            "-vv",
            "design",
            "--mode",
            "amp",
            "-n",
            "20",
            "--length-range",
            "12-24",
            "--seed",
            "7",
            "-o",
            "out",
            "-p",
            "batch",
            "-f",
            "csv,fasta",
            "--top",
            "5",
            "-S",
            "generator.diversity.max-retries=50",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Design(args) = cli.command else {
            panic!("expected design command");
        };
        assert_eq!(args.generation.mode, GenerationMode::Amp);
        assert_eq!(args.generation.count, Some(20));
        assert_eq!(args.generation.length_range, Some((12, 24)));
        assert_eq!(args.generation.seed, Some(7));
        assert_eq!(
            args.output.formats,
            Some(vec![ExportFormat::Csv, ExportFormat::Fasta])
        );
        assert_eq!(args.top, Some(5));
        assert_eq!(args.rank_by, "amp_score");
        assert_eq!(args.config.set_values.len(), 1);
    }

    #[test]
    fn evaluate_requires_sequences_or_input() {
        assert!(Cli::try_parse_from(["pepforge", "evaluate"]).is_err());
        assert!(Cli::try_parse_from(["pepforge", "evaluate", "KALK", "DDDD"]).is_ok());
        assert!(Cli::try_parse_from(["pepforge", "evaluate", "-i", "designs.csv"]).is_ok());
    }

    #[test]
    fn generate_parses_variant_positions() {
        let cli = Cli::try_parse_from([
            "pepforge",
            "generate",
            "--mode",
            "variant",
            "--template",
            "KALKKKLLKALKKK",
            "--positions",
            "1,4,7",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate command");
        };
        assert_eq!(args.generation.positions, Some(vec![1, 4, 7]));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pepforge", "-q", "-v", "generate"]).is_err());
    }
}
