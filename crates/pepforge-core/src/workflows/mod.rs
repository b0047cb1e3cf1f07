//! # Workflows Module
//!
//! High-level entry points that tie the generator, evaluator and exporter
//! together. Each workflow validates its configuration, reports progress
//! through a [`ProgressReporter`](crate::engine::progress::ProgressReporter)
//! and returns [`EngineError`](crate::engine::error::EngineError) on failure.
//!
//! - [`generate`] - single and batched sequence generation, with per-job seeding
//!   for reproducible parallel runs.
//! - [`evaluate`] - scoring of single sequences and of generated candidates.
//! - [`export`] - writing designs to CSV, JSON, FASTA and a Markdown report.

pub mod evaluate;
pub mod export;
pub mod generate;
