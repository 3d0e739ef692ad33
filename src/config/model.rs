//! Config struct definition and default implementation.

use crate::exec::DEFAULT_PROGRAM;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for the template functions.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Program `Graphviz` runs (default: "dot"). May be a name looked up on
    /// the search path or a path to the executable.
    #[serde(default = "default_graphviz_program")]
    pub graphviz_program: String,

    /// Seconds a child may run before it is killed. Unset waits forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    /// Directories to search for executables, in the platform's `PATH`
    /// format. Unset uses the `PATH` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_path: Option<String>,

    /// Extra environment variables for every child process.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graphviz_program: default_graphviz_program(),
            timeout_seconds: None,
            search_path: None,
            environment: BTreeMap::new(),
        }
    }
}

pub fn default_graphviz_program() -> String {
    DEFAULT_PROGRAM.to_string()
}
