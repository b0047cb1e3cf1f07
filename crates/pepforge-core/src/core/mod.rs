//! # Core Module
//!
//! Stateless building blocks shared by every other layer.
//!
//! - **Models** ([`models`]) - residues, sequences, candidates, evaluations and designs.
//!   The per-residue property table is a process-wide immutable static.
//! - **Descriptors** ([`descriptors`]) - pure functions from a sequence to a number:
//!   charge and isoelectric point, Kyte-Doolittle hydropathy and hydrophobic moment,
//!   composition, instability and secondary-structure propensities.
//! - **I/O** ([`io`]) - CSV, JSON, FASTA and Markdown artifacts, and the atomic
//!   artifact sink.

pub mod descriptors;
pub mod io;
pub mod models;
