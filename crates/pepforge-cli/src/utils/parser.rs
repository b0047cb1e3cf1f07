use pepforge::engine::config::ExportFormat;
use pepforge::engine::generator::PropertyConstraint;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid length range '{0}'. Expected 'MIN-MAX' (e.g., '10-30') or a single length.")]
    InvalidLengthRange(String),

    #[error("Invalid length range '{0}': the minimum must be at least 1 and not exceed the maximum.")]
    EmptyLengthRange(String),

    #[error("Unknown property constraint '{0}'. Expected one of: {1}.")]
    UnknownConstraint(String, &'static str),

    #[error("Unknown export format '{0}'. Expected one of: csv, json, fasta, report.")]
    UnknownFormat(String),
}

const CONSTRAINT_NAMES: &str =
    "hydrophobic, hydrophilic, positively-charged, negatively-charged, polar, aromatic, small";

/// Parses `MIN-MAX`, `MIN..MAX`, `MIN..=MAX` or a single length `N`.
pub fn parse_length_range(s: &str) -> Result<(usize, usize), ParseError> {
    let invalid = || ParseError::InvalidLengthRange(s.to_string());
    let trimmed = s.trim();
    let (low, high) = if let Some((a, b)) = trimmed.split_once("..=") {
        (a, b)
    } else if let Some((a, b)) = trimmed.split_once("..") {
        (a, b)
    } else if let Some((a, b)) = trimmed.split_once('-') {
        (a, b)
    } else {
        (trimmed, trimmed)
    };
    let low: usize = low.trim().parse().map_err(|_| invalid())?;
    let high: usize = high.trim().parse().map_err(|_| invalid())?;
    if low == 0 || low > high {
        return Err(ParseError::EmptyLengthRange(s.to_string()));
    }
    Ok((low, high))
}

pub fn parse_constraint(s: &str) -> Result<PropertyConstraint, ParseError> {
    s.parse()
        .map_err(|_| ParseError::UnknownConstraint(s.to_string(), CONSTRAINT_NAMES))
}

pub fn parse_format(s: &str) -> Result<ExportFormat, ParseError> {
    s.parse().map_err(|_| ParseError::UnknownFormat(s.to_string()))
}
