//! The `exec` template function namespace.
//!
//! A template engine registers [`Namespace::external`] and
//! [`Namespace::graphviz`] as helpers, or looks functions up by name with
//! [`Function`] and calls them through [`Namespace::call`].
//!
//! ```no_run
//! use tplexec::{Namespace, Value};
//!
//! let ns = Namespace::new();
//! let html = ns.external(&[Value::from("hello"), Value::from("cat")])?;
//! assert_eq!(html.as_str(), "hello");
//! # Ok::<(), tplexec::ExecError>(())
//! ```

use crate::error::{ExecError, Result};
use crate::exec::{CommandRunner, GraphRenderer};
use crate::markup::SafeHtml;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Template functions provided by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// `External(payload, program, args...)`
    External,
    /// `Graphviz(payload)`
    Graphviz,
}

impl Function {
    pub const ALL: [Function; 2] = [Function::External, Function::Graphviz];

    /// Name the function is registered under, without namespace prefix.
    pub fn name(self) -> &'static str {
        match self {
            Function::External => "External",
            Function::Graphviz => "Graphviz",
        }
    }

    /// Name including the `exec.` namespace prefix.
    pub fn qualified_name(self) -> String {
        format!("{}.{}", NAMESPACE, self.name())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = ExecError;

    /// Accepts `external`, `External`, `exec.External`, and the same forms
    /// of `graphviz`.
    fn from_str(s: &str) -> Result<Self> {
        let bare = s
            .strip_prefix(NAMESPACE)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(s);

        Function::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(bare))
            .ok_or_else(|| {
                ExecError::Argument(format!(
                    "unknown function '{}' (expected one of: external, graphviz)",
                    s
                ))
            })
    }
}

/// Namespace prefix templates use for these functions.
pub const NAMESPACE: &str = "exec";

/// Stateless handle over the `exec` template functions.
#[derive(Debug, Clone)]
pub struct Namespace {
    runner: CommandRunner,
    graphviz: GraphRenderer,
}

impl Namespace {
    /// Namespace resolving programs through `PATH`, with `dot` for Graphviz.
    pub fn new() -> Self {
        Self::with_runner(CommandRunner::new())
    }

    pub fn with_runner(runner: CommandRunner) -> Self {
        Self {
            graphviz: GraphRenderer::new(runner.clone()),
            runner,
        }
    }

    pub fn with_parts(runner: CommandRunner, graphviz: GraphRenderer) -> Self {
        Self { runner, graphviz }
    }

    /// `External(payload, program, args...)`: run `program` over `payload`
    /// and return its stdout.
    pub fn external(&self, args: &[Value]) -> Result<SafeHtml> {
        self.runner.run(args)
    }

    /// `Graphviz(payload)`: render DOT source to an inline `<svg>` element.
    pub fn graphviz(&self, input: &Value) -> Result<SafeHtml> {
        self.graphviz.render(input)
    }

    /// Call `function` with the raw template arguments.
    pub fn call(&self, function: Function, args: &[Value]) -> Result<SafeHtml> {
        match function {
            Function::External => self.external(args),
            Function::Graphviz => match args {
                [input] => self.graphviz(input),
                _ => Err(ExecError::Argument(format!(
                    "Graphviz takes exactly 1 argument, got {}",
                    args.len()
                ))),
            },
        }
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}
