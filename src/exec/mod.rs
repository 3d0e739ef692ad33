//! External command execution for templates.
//!
//! - **Invocation**: coercing `[payload, program, args...]` into strings
//! - **Runner**: resolving the program, spawning it, capturing stdout
//! - **Graphviz**: running `dot -Tsvg` and keeping only the `<svg>` element

mod graphviz;
mod invocation;
mod process;
mod runner;

pub use graphviz::{DEFAULT_PROGRAM, GraphRenderer, SVG_FORMAT_FLAG, SVG_MARKER, extract_svg};
pub use invocation::Invocation;
pub use runner::CommandRunner;
