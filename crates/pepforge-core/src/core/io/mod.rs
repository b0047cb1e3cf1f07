//! Reading and writing design artifacts.
//!
//! Each tabular or sequence format implements [`traits::DesignFile`] over the
//! flat [`record::DesignRecord`]. The Markdown report is write-only. All
//! artifacts reach disk through an [`sink::ArtifactSink`], which keeps partial
//! output from ever appearing at a final path.

pub mod csv;
pub mod error;
pub mod fasta;
pub mod json;
pub mod record;
pub mod report;
pub mod sink;
pub mod traits;
