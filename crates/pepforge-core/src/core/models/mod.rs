//! # Core Models Module
//!
//! This module contains the data structures used to describe residue sequences,
//! generated candidates and their scores throughout PepForge.
//!
//! ## Overview
//!
//! The models are deliberately small and immutable once built. Validation happens at
//! construction time, so downstream code (descriptors, the evaluator, exporters) can rely on
//! every value being well formed:
//!
//! - **Residues are always standard** - a [`sequence::Sequence`] can only hold the 20 codes
//!   of the property table
//! - **Summaries never drift** - a [`candidate::GeneratedCandidate`] computes its derived
//!   attributes once, from the sequence it owns
//! - **Scores are read-only** - an [`evaluation::EvaluationResult`] exposes no mutators
//!
//! ## Key Components
//!
//! - [`amino_acid`] - The static amino-acid property table and residue classification
//! - [`sequence`] - Validated residue sequences
//! - [`candidate`] - Generated sequences with provenance and summary attributes
//! - [`evaluation`] - Named scores produced by the evaluator
//! - [`design`] - Candidate/evaluation pairs, the unit of ranking and export
//!
//! ## Usage
//!
//! ```
//! use pepforge::core::models::sequence::Sequence;
//! use pepforge::core::models::candidate::{GeneratedCandidate, GenerationMethod};
//!
//! let sequence = Sequence::parse("KALKKKLLKALKKK").unwrap();
//! let candidate = GeneratedCandidate::new(sequence, GenerationMethod::External, "");
//! assert_eq!(candidate.net_charge(), 8.0);
//! ```

pub mod amino_acid;
pub mod candidate;
pub mod design;
pub mod evaluation;
pub mod sequence;
