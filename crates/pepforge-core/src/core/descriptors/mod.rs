//! Closed-form physicochemical descriptors of residue sequences.
//!
//! Every function here is a pure function of a validated [`Sequence`] and the
//! static property table. Because a [`Sequence`] is never empty, per-residue
//! averages are always well defined.
//!
//! [`Sequence`]: crate::core::models::sequence::Sequence

pub mod charge;
pub mod composition;
pub mod hydropathy;
