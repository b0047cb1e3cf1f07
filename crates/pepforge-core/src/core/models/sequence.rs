use super::amino_acid::AminoAcid;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SequenceError {
    #[error("Sequence is empty")]
    Empty,
    #[error("Unknown residue code '{code}' at position {position}")]
    UnknownResidue { position: usize, code: char },
}

/// An ordered, non-empty chain of standard residues.
///
/// Construction always goes through validation, so every residue held by a
/// `Sequence` is guaranteed to exist in the property table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    residues: Vec<AminoAcid>,
}

impl Sequence {
    pub fn from_residues(residues: Vec<AminoAcid>) -> Result<Self, SequenceError> {
        if residues.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(Self { residues })
    }

    /// Parses one-letter codes. Lowercase input is accepted; whitespace is not.
    pub fn parse(text: &str) -> Result<Self, SequenceError> {
        let residues = text
            .chars()
            .enumerate()
            .map(|(position, code)| {
                AminoAcid::from_code(code).ok_or(SequenceError::UnknownResidue { position, code })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_residues(residues)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn residues(&self) -> &[AminoAcid] {
        &self.residues
    }

    pub fn iter(&self) -> impl Iterator<Item = AminoAcid> + '_ {
        self.residues.iter().copied()
    }

    pub fn count_where(&self, predicate: impl Fn(AminoAcid) -> bool) -> usize {
        self.iter().filter(|&aa| predicate(aa)).count()
    }

    pub fn fraction_where(&self, predicate: impl Fn(AminoAcid) -> bool) -> f64 {
        self.count_where(predicate) as f64 / self.len() as f64
    }

    pub fn contains_motif(&self, motif: &str) -> bool {
        self.to_string().contains(&motif.to_ascii_uppercase())
    }

    /// Returns a copy with the residue at `position` replaced.
    pub fn with_substitution(&self, position: usize, residue: AminoAcid) -> Option<Self> {
        let mut residues = self.residues.clone();
        *residues.get_mut(position)? = residue;
        Some(Self { residues })
    }
}

impl Index<usize> for Sequence {
    type Output = AminoAcid;

    fn index(&self, index: usize) -> &Self::Output {
        &self.residues[index]
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for aa in &self.residues {
            write!(f, "{}", aa.code())?;
        }
        Ok(())
    }
}

impl FromStr for Sequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Sequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Sequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
