use crate::error::{CliError, Result};
use pepforge::engine::config::{EvaluatorConfig, ExportFormat, GeneratorConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOutputConfig {
    pub dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub formats: Option<Vec<ExportFormat>>,
    pub fasta_line_width: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileGenerationConfig {
    pub count: Option<usize>,
    pub length: Option<usize>,
    pub length_min: Option<usize>,
    pub length_max: Option<usize>,
    pub mutations: Option<usize>,
}

/// Configuration as read from a TOML file. Every field may be omitted.
///
/// ```toml
/// seed = 42
///
/// [generation]
/// count = 50
/// length-min = 12
/// length-max = 24
///
/// [output]
/// dir = "designs"
/// formats = ["csv", "fasta"]
///
/// [generator.diversity]
/// min-distance = 0.4
///
/// [evaluator.amp]
/// charge = 0.5
/// ```
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub seed: Option<u64>,
    pub generation: Option<FileGenerationConfig>,
    pub output: Option<FileOutputConfig>,
    pub generator: Option<GeneratorConfig>,
    pub evaluator: Option<EvaluatorConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn empty_file_yields_empty_config() {
        let file = write_config("");
        assert_eq!(FileConfig::from_file(file.path()).unwrap(), FileConfig::default());
    }

    #[test]
    fn nested_library_sections_fill_in_defaults() {
        let file = write_config(
            r#"
seed = 7

[generation]
count = 25
length-min = 12
length-max = 18

[output]
prefix = "amp"
formats = ["csv", "report"]

[generator.diversity]
min-distance = 0.45

[evaluator]
moment-angle-degrees = 160.0
"#,
        );
        let config = FileConfig::from_file(file.path()).unwrap();
        assert_eq!(config.seed, Some(7));

        let generation = config.generation.unwrap();
        assert_eq!(generation.count, Some(25));
        assert_eq!(generation.length_min, Some(12));
        assert_eq!(generation.length, None);

        let output = config.output.unwrap();
        assert_eq!(output.prefix.as_deref(), Some("amp"));
        assert_eq!(
            output.formats,
            Some(vec![ExportFormat::Csv, ExportFormat::Report])
        );

        let generator = config.generator.unwrap();
        assert_eq!(generator.diversity.min_distance, 0.45);
        assert_eq!(generator.amp_bias, GeneratorConfig::default().amp_bias);
        assert_eq!(config.evaluator.unwrap().moment_angle_degrees, 160.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config("[output]\ndirectory = \"out\"\n");
        assert!(matches!(
            FileConfig::from_file(file.path()),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
