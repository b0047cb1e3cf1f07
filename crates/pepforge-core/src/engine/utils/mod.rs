//! Utility functions for the engine module.
//!
//! This module provides the helpers the generator and evaluator are built on: the injectable
//! random source used for every stochastic draw, and the sequence distance metrics used by
//! diversity sampling.

pub mod distance;
pub mod sampling;
