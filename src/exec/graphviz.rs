//! The `Graphviz` template function: render DOT source to inline SVG.

use super::invocation::Invocation;
use super::runner::CommandRunner;
use crate::error::{ExecError, Result};
use crate::markup::SafeHtml;
use crate::value::Value;

/// Default Graphviz layout program.
pub const DEFAULT_PROGRAM: &str = "dot";

/// Output-format flag passed to the layout program.
pub const SVG_FORMAT_FLAG: &str = "-Tsvg";

/// Start of the SVG element in the layout program's output.
pub const SVG_MARKER: &str = "<svg";

/// Renders DOT graphs to SVG markup suitable for inlining in a page.
#[derive(Debug, Clone)]
pub struct GraphRenderer {
    runner: CommandRunner,
    program: String,
}

impl GraphRenderer {
    pub fn new(runner: CommandRunner) -> Self {
        Self::with_program(runner, DEFAULT_PROGRAM)
    }

    /// Use `program` (e.g. `neato` or an absolute path) instead of `dot`.
    pub fn with_program(runner: CommandRunner, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the layout program over `input` and return the `<svg ...>...`
    /// element, dropping any XML prologue or doctype printed before it.
    ///
    /// Runner failures are returned unchanged. Output without an `<svg`
    /// element is an `ExecError::OutputFormat`.
    pub fn render(&self, input: &Value) -> Result<SafeHtml> {
        let payload = input.to_text().map_err(|e| match e {
            ExecError::Argument(reason) => {
                ExecError::Argument(format!("input (position 0): {}", reason))
            }
            other => other,
        })?;

        let invocation = Invocation::new(payload, self.program.as_str(), [SVG_FORMAT_FLAG]);
        let output = self.runner.run_invocation(&invocation)?;

        extract_svg(output.as_str())
            .map(SafeHtml::new)
            .ok_or_else(|| {
                ExecError::OutputFormat(format!(
                    "no {}> element in {} output",
                    SVG_MARKER, self.program
                ))
            })
    }
}

/// Slice `output` from the first `<svg` marker to the end.
pub fn extract_svg(output: &str) -> Option<&str> {
    output.find(SVG_MARKER).map(|start| &output[start..])
}
