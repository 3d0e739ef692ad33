//! Turning loosely-typed template arguments into a concrete invocation.

use crate::error::{ExecError, Result};
use crate::value::Value;

/// A fully coerced request to run one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Text written to the child's stdin.
    pub payload: String,
    /// Executable name, resolved against the search path before spawning.
    pub program: String,
    /// Command-line arguments, in order.
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(
        payload: impl Into<String>,
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            payload: payload.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build an invocation from `[payload, program, args...]`.
    ///
    /// Every element is coerced with [`Value::to_text`]; a missing payload or
    /// program, or any element without a text form, is an
    /// `ExecError::Argument` naming the offending position.
    pub fn from_args(args: &[Value]) -> Result<Self> {
        if args.len() < 2 {
            return Err(ExecError::Argument(format!(
                "expected at least 2 arguments (input, command), got {}",
                args.len()
            )));
        }

        let payload = coerce(&args[0], "input (position 0)")?;
        let program = coerce(&args[1], "command (position 1)")?;
        let args = args[2..]
            .iter()
            .enumerate()
            .map(|(i, v)| coerce(v, &format!("command argument (position {})", i + 2)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            payload,
            program,
            args,
        })
    }

    /// The command line as a shell would show it, for logs and errors.
    pub fn command_line(&self) -> String {
        shell_words::join(std::iter::once(&self.program).chain(self.args.iter()))
    }
}

fn coerce(value: &Value, what: &str) -> Result<String> {
    value.to_text().map_err(|e| match e {
        ExecError::Argument(reason) => ExecError::Argument(format!("{}: {}", what, reason)),
        other => other,
    })
}
