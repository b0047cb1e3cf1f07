use pepforge::core::io::error::ExportError;
use pepforge::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    PepForgeCore(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("{failed} of {attempted} artifact(s) could not be written")]
    PartialExport { failed: usize, attempted: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        CliError::PepForgeCore(e.into())
    }
}
