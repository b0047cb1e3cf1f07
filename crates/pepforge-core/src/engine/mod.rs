//! # Engine Module
//!
//! The stateful and configurable parts of PepForge.
//!
//! - **Generation** ([`generator`]) - random, constrained, antimicrobial-biased,
//!   diversity-sampled and template-derived sequences. All randomness flows
//!   through the [`utils::sampling::RandomSource`] the generator owns.
//! - **Evaluation** ([`evaluator`]) - descriptor profiles and the composite
//!   stability, solubility and antimicrobial scores.
//! - **Export** ([`exporter`]) - per-format artifact writing with an
//!   [`exporter::ExportOutcome`] that records partial failures.
//! - **Configuration** ([`config`]), **errors** ([`error`]) and **progress**
//!   ([`progress`]) shared by all of the above.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod exporter;
pub mod generator;
pub mod progress;
pub mod utils;
