//! CLI argument parsing for tplexec.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tplexec: run the `exec` template functions from a shell.
///
/// The payload is read from `--input` or stdin, and the function's result is
/// written to stdout exactly as a template would receive it.
#[derive(Parser, Debug)]
#[command(name = "tplexec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// YAML config file (search path, timeout, environment, Graphviz program).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for tplexec.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a program with the payload on stdin and print its stdout.
    External(ExternalArgs),

    /// Render DOT source to an inline `<svg>` element.
    Graphviz(GraphvizArgs),
}

/// Arguments for the `external` command.
#[derive(Parser, Debug)]
pub struct ExternalArgs {
    /// Read the payload from this file instead of stdin.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Program to run, looked up on the search path.
    pub program: String,

    /// Arguments passed to the program.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for the `graphviz` command.
#[derive(Parser, Debug)]
pub struct GraphvizArgs {
    /// Read the DOT source from this file instead of stdin.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
