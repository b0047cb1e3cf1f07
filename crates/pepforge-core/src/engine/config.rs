use super::utils::distance::DistanceMetric;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid configuration in '{path}': {source}")]
    Invalid { path: String, source: ConfigError },
}

fn load_toml<T>(path: &Path) -> Result<T, ConfigLoadError>
where
    T: for<'de> Deserialize<'de>,
{
    let content = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigLoadError::Toml {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

fn ensure_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            name,
            reason: format!("must be a finite, non-negative number (got {value})"),
        })
    }
}

fn ensure_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            name,
            reason: format!("must be a finite, positive number (got {value})"),
        })
    }
}

fn ensure_weights(name: &'static str, weights: &[f64]) -> Result<(), ConfigError> {
    for &w in weights {
        ensure_non_negative(name, w)?;
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(ConfigError::InvalidValue {
            name,
            reason: "at least one weight must be positive".to_string(),
        });
    }
    Ok(())
}

fn ensure_window(name: &'static str, low: f64, high: f64) -> Result<(), ConfigError> {
    if low.is_finite() && high.is_finite() && low <= high {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            name,
            reason: format!("lower bound {low} must not exceed upper bound {high}"),
        })
    }
}

// --- Generation ---

/// Residue-class weights steering antimicrobial peptide generation.
///
/// At residue `i` the hydrophobic weight is scaled by `1 + p·cos(i·100°)` and the
/// cationic weight by `1 - p·cos(i·100°)`, where `p` is `amphipathic_phasing`.
/// With `p = 0` the class weights are used unchanged at every position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct AmpBias {
    pub cationic_weight: f64,
    pub hydrophobic_weight: f64,
    pub polar_weight: f64,
    pub other_weight: f64,
    pub amphipathic_phasing: f64,
}

impl Default for AmpBias {
    fn default() -> Self {
        Self {
            cationic_weight: 0.40,
            hydrophobic_weight: 0.45,
            polar_weight: 0.10,
            other_weight: 0.05,
            amphipathic_phasing: 0.6,
        }
    }
}

impl AmpBias {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_weights(
            "amp-bias weights",
            &[
                self.cationic_weight,
                self.hydrophobic_weight,
                self.polar_weight,
                self.other_weight,
            ],
        )?;
        if !(0.0..=1.0).contains(&self.amphipathic_phasing) {
            return Err(ConfigError::InvalidValue {
                name: "amphipathic-phasing",
                reason: format!("must lie in [0, 1] (got {})", self.amphipathic_phasing),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct DiversityConfig {
    pub metric: DistanceMetric,
    /// A candidate is accepted when its distance to every accepted sequence is at least this.
    pub min_distance: f64,
    /// Attempts per slot before the best candidate seen is accepted anyway.
    pub max_retries: usize,
    /// Draw candidates from natural abundance rather than uniformly.
    pub weighted: bool,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::Hamming,
            min_distance: 0.3,
            max_retries: 200,
            weighted: true,
        }
    }
}

impl DiversityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_distance) {
            return Err(ConfigError::InvalidValue {
                name: "min-distance",
                reason: format!("must lie in [0, 1] (got {})", self.min_distance),
            });
        }
        if self.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                name: "max-retries",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct GeneratorConfig {
    pub amp_bias: AmpBias,
    pub diversity: DiversityConfig,
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let config: Self = load_toml(path)?;
        config.validate().map_err(|e| ConfigLoadError::Invalid {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.amp_bias.validate()?;
        self.diversity.validate()
    }
}

// --- Evaluation ---

/// Weights of the stability sub-scores, plus the GRAVY window considered favourable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct StabilityWeights {
    pub composition: f64,
    pub hydropathy: f64,
    pub structure_balance: f64,
    pub charge_distribution: f64,
    pub amphipathic_packing: f64,
    pub hydropathy_low: f64,
    pub hydropathy_high: f64,
    pub hydropathy_falloff: f64,
}

impl Default for StabilityWeights {
    fn default() -> Self {
        Self {
            composition: 0.35,
            hydropathy: 0.20,
            structure_balance: 0.15,
            charge_distribution: 0.20,
            amphipathic_packing: 0.10,
            hydropathy_low: -0.5,
            hydropathy_high: 1.0,
            hydropathy_falloff: 2.0,
        }
    }
}

/// Weights of the solubility sub-scores and their favourable windows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct SolubilityWeights {
    pub charge_density: f64,
    pub hydrophilicity: f64,
    pub charged_fraction: f64,
    pub charge_density_low: f64,
    pub charge_density_high: f64,
    pub charge_density_falloff: f64,
    pub charged_fraction_low: f64,
    pub charged_fraction_high: f64,
    pub charged_fraction_falloff: f64,
}

impl Default for SolubilityWeights {
    fn default() -> Self {
        Self {
            charge_density: 0.35,
            hydrophilicity: 0.40,
            charged_fraction: 0.25,
            charge_density_low: 0.01,
            charge_density_high: 0.15,
            charge_density_falloff: 0.15,
            charged_fraction_low: 0.15,
            charged_fraction_high: 0.35,
            charged_fraction_falloff: 0.20,
        }
    }
}

/// Composition of the antimicrobial score.
///
/// `amp_score = Σ wᵢ·sᵢ / Σ wᵢ - penalty`, clamped to `[0, 1]`, where the
/// sub-scores are a logistic of net charge, the normalized helical moment,
/// the balance of hydrophobic fraction around `ideal_hydrophobic_fraction`,
/// and membership of the length window.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct AmpWeights {
    pub charge: f64,
    pub moment: f64,
    pub amphipathicity: f64,
    pub length: f64,
    pub charge_midpoint: f64,
    pub charge_scale: f64,
    pub ideal_hydrophobic_fraction: f64,
    pub length_min: usize,
    pub length_max: usize,
    pub length_falloff: f64,
    pub rare_residue_limit: f64,
    pub rare_residue_penalty: f64,
}

impl Default for AmpWeights {
    fn default() -> Self {
        Self {
            charge: 0.45,
            moment: 0.25,
            amphipathicity: 0.20,
            length: 0.10,
            charge_midpoint: 2.0,
            charge_scale: 1.5,
            ideal_hydrophobic_fraction: 0.5,
            length_min: 10,
            length_max: 30,
            length_falloff: 10.0,
            rare_residue_limit: 0.2,
            rare_residue_penalty: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct EvaluatorConfig {
    pub stability: StabilityWeights,
    pub solubility: SolubilityWeights,
    pub amp: AmpWeights,
    pub moment_angle_degrees: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            stability: StabilityWeights::default(),
            solubility: SolubilityWeights::default(),
            amp: AmpWeights::default(),
            moment_angle_degrees: 100.0,
        }
    }
}

impl EvaluatorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let config: Self = load_toml(path)?;
        config.validate().map_err(|e| ConfigLoadError::Invalid {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.stability;
        ensure_weights(
            "stability weights",
            &[
                s.composition,
                s.hydropathy,
                s.structure_balance,
                s.charge_distribution,
                s.amphipathic_packing,
            ],
        )?;
        ensure_window("stability hydropathy window", s.hydropathy_low, s.hydropathy_high)?;
        ensure_positive("hydropathy-falloff", s.hydropathy_falloff)?;

        let sol = &self.solubility;
        ensure_weights(
            "solubility weights",
            &[sol.charge_density, sol.hydrophilicity, sol.charged_fraction],
        )?;
        ensure_window(
            "charge density window",
            sol.charge_density_low,
            sol.charge_density_high,
        )?;
        ensure_window(
            "charged fraction window",
            sol.charged_fraction_low,
            sol.charged_fraction_high,
        )?;
        ensure_positive("charge-density-falloff", sol.charge_density_falloff)?;
        ensure_positive("charged-fraction-falloff", sol.charged_fraction_falloff)?;

        let a = &self.amp;
        ensure_weights("amp weights", &[a.charge, a.moment, a.amphipathicity, a.length])?;
        ensure_positive("charge-scale", a.charge_scale)?;
        ensure_positive("length-falloff", a.length_falloff)?;
        ensure_non_negative("rare-residue-penalty", a.rare_residue_penalty)?;
        if !(0.0..=1.0).contains(&a.ideal_hydrophobic_fraction) {
            return Err(ConfigError::InvalidValue {
                name: "ideal-hydrophobic-fraction",
                reason: format!("must lie in [0, 1] (got {})", a.ideal_hydrophobic_fraction),
            });
        }
        if a.length_min > a.length_max {
            return Err(ConfigError::InvalidValue {
                name: "amp length window",
                reason: format!(
                    "length-min {} must not exceed length-max {}",
                    a.length_min, a.length_max
                ),
            });
        }
        ensure_positive("moment-angle-degrees", self.moment_angle_degrees)
    }
}

// --- Export ---

/// Artifact formats produced by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    Csv,
    Json,
    Fasta,
    Report,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Csv,
        ExportFormat::Json,
        ExportFormat::Fasta,
        ExportFormat::Report,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Fasta => "fasta",
            ExportFormat::Report => "report",
        }
    }

    /// File name suffix appended to the export prefix.
    pub fn file_suffix(self) -> &'static str {
        match self {
            ExportFormat::Csv => ".csv",
            ExportFormat::Json => ".json",
            ExportFormat::Fasta => ".fasta",
            ExportFormat::Report => "_report.md",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::InvalidValue {
                name: "format",
                reason: format!("unknown export format '{s}'"),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub formats: Vec<ExportFormat>,
    pub fasta_line_width: usize,
}

#[derive(Default)]
pub struct ExportConfigBuilder {
    output_dir: Option<PathBuf>,
    formats: Option<Vec<ExportFormat>>,
    fasta_line_width: Option<usize>,
}

impl ExportConfigBuilder {
    pub const DEFAULT_FASTA_LINE_WIDTH: usize = 60;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }
    pub fn formats(mut self, formats: Vec<ExportFormat>) -> Self {
        self.formats = Some(formats);
        self
    }
    pub fn fasta_line_width(mut self, width: usize) -> Self {
        self.fasta_line_width = Some(width);
        self
    }

    pub fn build(self) -> Result<ExportConfig, ConfigError> {
        let output_dir = self
            .output_dir
            .ok_or(ConfigError::MissingParameter("output_dir"))?;
        let mut formats = self.formats.unwrap_or_else(|| ExportFormat::ALL.to_vec());
        formats.sort_unstable();
        formats.dedup();
        if formats.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "formats",
                reason: "at least one export format is required".to_string(),
            });
        }
        let fasta_line_width = self
            .fasta_line_width
            .unwrap_or(Self::DEFAULT_FASTA_LINE_WIDTH);
        if fasta_line_width == 0 {
            return Err(ConfigError::InvalidValue {
                name: "fasta_line_width",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(ExportConfig {
            output_dir,
            formats,
            fasta_line_width,
        })
    }
}
