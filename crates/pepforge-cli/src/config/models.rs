use pepforge::engine::config::{EvaluatorConfig, ExportConfig, GeneratorConfig};

/// Sizes and shapes of the sequences a command asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub count: usize,
    pub length: usize,
    pub length_range: (usize, usize),
    pub mutations: usize,
}

pub struct AppConfig {
    pub seed: Option<u64>,
    pub prefix: String,
    pub generation: GenerationSettings,
    pub generator: GeneratorConfig,
    pub evaluator: EvaluatorConfig,
    pub export: ExportConfig,
}
