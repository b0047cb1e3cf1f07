//! # PepForge Core Library
//!
//! Generation, physicochemical scoring and export of peptide sequence designs.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AminoAcid`, `Sequence`,
//!   `Design`), the immutable residue property table, pure descriptor functions
//!   (charge, hydropathy, composition) and artifact I/O.
//!
//! - **[`engine`]: The Logic Core.** The `SequenceGenerator` with its injected
//!   `RandomSource`, the configurable `SequenceEvaluator`, the atomic
//!   `DesignExporter`, configuration builders, errors and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Entry points that run generation,
//!   evaluation and export end to end, including seeded parallel batches.

pub mod core;
pub mod engine;
pub mod workflows;
