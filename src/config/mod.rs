//! Configuration model for tplexec.
//!
//! This module defines the Config struct read from a YAML file (passed with
//! `--config` on the command line). It supports forward-compatible parsing
//! (unknown fields are ignored), defaults for every field, and validation.

mod model;
mod operations;


// Re-export public API
pub use model::{Config, default_graphviz_program};
