//! tplexec: template functions that pipe content through external tools.
//!
//! Two functions are provided for a template engine's `exec` namespace:
//!
//! - `External(payload, program, args...)` runs `program` with `args`, writes
//!   `payload` to its stdin, and returns its stdout.
//! - `Graphviz(payload)` runs `dot -Tsvg` over DOT source and returns the
//!   `<svg>` element from the output.
//!
//! Both return [`SafeHtml`], text the rendering layer should embed without
//! escaping.

pub mod config;
pub mod error;
pub mod exec;
pub mod exit_codes;
pub mod markup;
pub mod namespace;
pub mod resolve;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::{ExecError, Result};
pub use exec::{CommandRunner, GraphRenderer, Invocation};
pub use markup::SafeHtml;
pub use namespace::{Function, Namespace};
pub use resolve::{PathResolver, SearchPath};
pub use value::Value;
