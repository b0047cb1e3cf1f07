use directories::ProjectDirs;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub prefix: String,
    pub count: usize,
    pub length: usize,
    pub length_min: usize,
    pub length_max: usize,
    pub mutations: usize,
    pub output_dir: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            prefix: "design".to_string(),
            count: 10,
            length: 20,
            length_min: 10,
            length_max: 30,
            mutations: 1,
            output_dir: default_output_dir(),
        }
    }
}

/// `<data dir>/designs` for the current user, or `./designs` when no home
/// directory can be determined.
fn default_output_dir() -> PathBuf {
    ProjectDirs::from("", "", "pepforge")
        .map(|dirs| dirs.data_dir().join("designs"))
        .unwrap_or_else(|| PathBuf::from("designs"))
}
