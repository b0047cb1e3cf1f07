use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, GenerationSettings};
use crate::cli::{ConfigArgs, GenerationArgs, OutputArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use pepforge::engine::config::ExportConfigBuilder;
use pepforge::engine::utils::distance::DistanceMetric;
use std::path::PathBuf;
use std::str::FromStr;

/// Resolves the effective configuration of a command.
///
/// `generation` is `None` for commands that do not generate sequences; the
/// generation settings then come from the file and defaults alone.
pub fn build_config(
    generation: Option<&GenerationArgs>,
    output: &OutputArgs,
    config_args: &ConfigArgs,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &config_args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &config_args.set_values)?;

    let gen_file = file_config.generation.take().unwrap_or_default();
    let out_file = file_config.output.take().unwrap_or_default();

    let seed = generation.and_then(|g| g.seed).or(file_config.seed);

    let count = generation
        .and_then(|g| g.count)
        .or(gen_file.count)
        .unwrap_or(defaults.count);
    let length = generation
        .and_then(|g| g.length)
        .or(gen_file.length)
        .unwrap_or(defaults.length);
    let length_range = match generation.and_then(|g| g.length_range) {
        Some(range) => range,
        None => (
            gen_file.length_min.unwrap_or(defaults.length_min),
            gen_file.length_max.unwrap_or(defaults.length_max),
        ),
    };
    let mutations = generation
        .and_then(|g| g.mutations)
        .or(gen_file.mutations)
        .unwrap_or(defaults.mutations);

    let prefix = output
        .prefix
        .clone()
        .or(out_file.prefix)
        .unwrap_or(defaults.prefix);

    let generator = file_config.generator.take().unwrap_or_default();
    generator
        .validate()
        .map_err(|e| CliError::Config(format!("[generator] {e}")))?;
    let evaluator = file_config.evaluator.take().unwrap_or_default();
    evaluator
        .validate()
        .map_err(|e| CliError::Config(format!("[evaluator] {e}")))?;

    let output_dir = output
        .output_dir
        .clone()
        .or(out_file.dir)
        .unwrap_or(defaults.output_dir);
    let mut export_builder = ExportConfigBuilder::new().output_dir(output_dir);
    if let Some(formats) = output.formats.clone().or(out_file.formats) {
        export_builder = export_builder.formats(formats);
    }
    if let Some(width) = out_file.fasta_line_width {
        export_builder = export_builder.fasta_line_width(width);
    }
    let export = export_builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        seed,
        prefix,
        generation: GenerationSettings {
            count,
            length,
            length_range,
            mutations,
        },
        generator,
        evaluator,
        export,
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {kind} value for {key}: {value}")))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{kv_pair}'. Expected KEY=VALUE."
            )));
        };
        let key = key.trim();

        match key {
            "seed" => config.seed = Some(parse_value(key, value_str, "integer")?),

            "generation.count" => {
                config.generation.get_or_insert_with(Default::default).count =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "generation.length" => {
                config.generation.get_or_insert_with(Default::default).length =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "generation.length-min" => {
                config
                    .generation
                    .get_or_insert_with(Default::default)
                    .length_min = Some(parse_value(key, value_str, "integer")?);
            }
            "generation.length-max" => {
                config
                    .generation
                    .get_or_insert_with(Default::default)
                    .length_max = Some(parse_value(key, value_str, "integer")?);
            }
            "generation.mutations" => {
                config
                    .generation
                    .get_or_insert_with(Default::default)
                    .mutations = Some(parse_value(key, value_str, "integer")?);
            }

            "output.dir" => {
                config.output.get_or_insert_with(Default::default).dir =
                    Some(PathBuf::from(value_str.trim()));
            }
            "output.prefix" => {
                config.output.get_or_insert_with(Default::default).prefix =
                    Some(value_str.trim().to_string());
            }
            "output.formats" => {
                let formats = value_str
                    .split(',')
                    .map(|f| parser::parse_format(f).map_err(|e| CliError::Config(e.to_string())))
                    .collect::<Result<Vec<_>>>()?;
                config.output.get_or_insert_with(Default::default).formats = Some(formats);
            }
            "output.fasta-line-width" => {
                config
                    .output
                    .get_or_insert_with(Default::default)
                    .fasta_line_width = Some(parse_value(key, value_str, "integer")?);
            }

            "generator.amp-bias.cationic-weight" => {
                config
                    .generator
                    .get_or_insert_with(Default::default)
                    .amp_bias
                    .cationic_weight = parse_value(key, value_str, "float")?;
            }
            "generator.amp-bias.hydrophobic-weight" => {
                config
                    .generator
                    .get_or_insert_with(Default::default)
                    .amp_bias
                    .hydrophobic_weight = parse_value(key, value_str, "float")?;
            }
            "generator.amp-bias.polar-weight" => {
                config
                    .generator
                    .get_or_insert_with(Default::default)
                    .amp_bias
                    .polar_weight = parse_value(key, value_str, "float")?;
            }
            "generator.amp-bias.other-weight" => {
                config
                    .generator
                    .get_or_insert_with(Default::default)
                    .amp_bias
                    .other_weight = parse_value(key, value_str, "float")?;
            }
            "generator.amp-bias.amphipathic-phasing" => {
                config
                    .generator
                    .get_or_insert_with(Default::default)
                    .amp_bias
                    .amphipathic_phasing = parse_value(key, value_str, "float")?;
            }
            "generator.diversity.min-distance" => {
                config
                    .generator
                    .get_or_insert_with(Default::default)
                    .diversity
                    .min_distance = parse_value(key, value_str, "float")?;
            }
            "generator.diversity.max-retries" => {
                config
                    .generator
                    .get_or_insert_with(Default::default)
                    .diversity
                    .max_retries = parse_value(key, value_str, "integer")?;
            }
            "generator.diversity.weighted" => {
                config
                    .generator
                    .get_or_insert_with(Default::default)
                    .diversity
                    .weighted = parse_value(key, value_str, "boolean")?;
            }
            "generator.diversity.metric" => {
                let metric = match value_str.trim().to_ascii_lowercase().as_str() {
                    "hamming" => DistanceMetric::Hamming,
                    "composition" => DistanceMetric::Composition,
                    other => {
                        return Err(CliError::Config(format!(
                            "Invalid metric for {key}: '{other}'. Expected 'hamming' or 'composition'."
                        )));
                    }
                };
                config
                    .generator
                    .get_or_insert_with(Default::default)
                    .diversity
                    .metric = metric;
            }

            "evaluator.moment-angle-degrees" => {
                config
                    .evaluator
                    .get_or_insert_with(Default::default)
                    .moment_angle_degrees = parse_value(key, value_str, "float")?;
            }
            "evaluator.amp.charge" => {
                config.evaluator.get_or_insert_with(Default::default).amp.charge =
                    parse_value(key, value_str, "float")?;
            }
            "evaluator.amp.moment" => {
                config.evaluator.get_or_insert_with(Default::default).amp.moment =
                    parse_value(key, value_str, "float")?;
            }
            "evaluator.amp.amphipathicity" => {
                config
                    .evaluator
                    .get_or_insert_with(Default::default)
                    .amp
                    .amphipathicity = parse_value(key, value_str, "float")?;
            }
            "evaluator.amp.length" => {
                config.evaluator.get_or_insert_with(Default::default).amp.length =
                    parse_value(key, value_str, "float")?;
            }
            "evaluator.amp.length-min" => {
                config
                    .evaluator
                    .get_or_insert_with(Default::default)
                    .amp
                    .length_min = parse_value(key, value_str, "integer")?;
            }
            "evaluator.amp.length-max" => {
                config
                    .evaluator
                    .get_or_insert_with(Default::default)
                    .amp
                    .length_max = parse_value(key, value_str, "integer")?;
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{key}'"
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::GenerationMode;
    use pepforge::engine::config::{EvaluatorConfig, ExportFormat, GeneratorConfig};
    use std::fs;
    use tempfile::tempdir;

    fn base_generation_args() -> GenerationArgs {
        GenerationArgs {
            mode: GenerationMode::Amp,
            count: None,
            length: None,
            length_range: None,
            constraint: None,
            template: None,
            mutations: None,
            positions: None,
            seed: None,
        }
    }

    fn output_in(dir: &std::path::Path) -> OutputArgs {
        OutputArgs {
            output_dir: Some(dir.to_path_buf()),
            ..OutputArgs::default()
        }
    }

    #[test]
    fn build_config_uses_defaults_when_nothing_is_given() {
        let dir = tempdir().unwrap();
        let app = build_config(
            Some(&base_generation_args()),
            &output_in(dir.path()),
            &ConfigArgs::default(),
        )
        .unwrap();
        let defaults = DefaultsConfig::default();

        assert_eq!(app.seed, None);
        assert_eq!(app.prefix, defaults.prefix);
        assert_eq!(app.generation.count, defaults.count);
        assert_eq!(app.generation.length, defaults.length);
        assert_eq!(
            app.generation.length_range,
            (defaults.length_min, defaults.length_max)
        );
        assert_eq!(app.generation.mutations, defaults.mutations);
        assert_eq!(app.generator, GeneratorConfig::default());
        assert_eq!(app.evaluator, EvaluatorConfig::default());
        assert_eq!(app.export.output_dir, dir.path());
        assert_eq!(app.export.formats, ExportFormat::ALL.to_vec());
    }

    #[test]
    fn build_config_reads_file_and_cli_takes_precedence() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        fs::write(
            &cfg_path,
            r#"
seed = 11

[generation]
count = 40
length = 16
length-min = 8
length-max = 12

[output]
prefix = "from_file"
formats = ["json"]
fasta-line-width = 70

[generator.amp-bias]
amphipathic-phasing = 0.2
"#,
        )
        .unwrap();

        let mut gen_args = base_generation_args();
        gen_args.count = Some(5);
        gen_args.seed = Some(99);
        let output = OutputArgs {
            prefix: Some("from_cli".to_string()),
            ..output_in(dir.path())
        };
        let config_args = ConfigArgs {
            config: Some(cfg_path),
            set_values: vec![],
        };

        let app = build_config(Some(&gen_args), &output, &config_args).unwrap();
        assert_eq!(app.seed, Some(99));
        assert_eq!(app.generation.count, 5);
        assert_eq!(app.generation.length, 16);
        assert_eq!(app.generation.length_range, (8, 12));
        assert_eq!(app.prefix, "from_cli");
        assert_eq!(app.export.formats, vec![ExportFormat::Json]);
        assert_eq!(app.export.fasta_line_width, 70);
        assert_eq!(app.generator.amp_bias.amphipathic_phasing, 0.2);
    }

    #[test]
    fn set_values_override_the_file() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        fs::write(&cfg_path, "seed = 1\n[generator.diversity]\nmax-retries = 10\n").unwrap();

        let config_args = ConfigArgs {
            config: Some(cfg_path),
            set_values: vec![
                "seed=2".to_string(),
                "generator.diversity.max-retries=25".to_string(),
                "generator.diversity.metric=composition".to_string(),
                "evaluator.amp.length-max=40".to_string(),
                "output.formats=csv,fasta".to_string(),
            ],
        };
        let app = build_config(None, &output_in(dir.path()), &config_args).unwrap();

        assert_eq!(app.seed, Some(2));
        assert_eq!(app.generator.diversity.max_retries, 25);
        assert_eq!(app.generator.diversity.metric, DistanceMetric::Composition);
        assert_eq!(app.evaluator.amp.length_max, 40);
        assert_eq!(
            app.export.formats,
            vec![ExportFormat::Csv, ExportFormat::Fasta]
        );
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in [
            "seed",
            "seed=abc",
            "generator.unknown=1",
            "generator.diversity.metric=euclid",
            "output.formats=csv,xml",
        ] {
            let result = apply_set_values(FileConfig::default(), &[bad.to_string()]);
            assert!(matches!(result, Err(CliError::Config(_))), "accepted {bad}");
        }
    }

    #[test]
    fn invalid_library_values_surface_as_config_errors() {
        let dir = tempdir().unwrap();
        let config_args = ConfigArgs {
            config: None,
            set_values: vec!["generator.diversity.min-distance=1.5".to_string()],
        };
        let result = build_config(None, &output_in(dir.path()), &config_args);
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("min-distance")));
    }
}
