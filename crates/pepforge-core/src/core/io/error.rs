use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No designs to export")]
    NoDesigns,

    #[error("Invalid export prefix '{0}': must be a non-empty file name stem")]
    InvalidPrefix(String),

    #[error("File I/O error for '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("I/O error: {0}")]
    Stream(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed {format} record on line {line}: {reason}")]
    Parse {
        format: &'static str,
        line: usize,
        reason: String,
    },
}

impl ExportError {
    pub(crate) fn at_path(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}
