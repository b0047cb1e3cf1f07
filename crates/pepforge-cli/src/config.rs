//! Command-line configuration.
//!
//! Values are resolved per field with the precedence CLI flag > `--set`
//! override > TOML file > built-in default.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;
