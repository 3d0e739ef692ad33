//! Command implementations for tplexec.
//!
//! Each command builds the template namespace from config, reads the payload,
//! calls the matching template function, and writes the result to stdout.

use crate::cli::{Command, ExternalArgs, GraphvizArgs};
use std::io::{self, Read, Write};
use std::path::Path;
use tplexec::{Config, ExecError, Function, Namespace, Result, Value};

/// Dispatch a command to its implementation.
pub fn dispatch(config_path: Option<&Path>, command: Command) -> Result<()> {
    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let ns = config.namespace();

    let output = match command {
        Command::External(args) => cmd_external(&ns, args)?,
        Command::Graphviz(args) => cmd_graphviz(&ns, args)?,
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| ExecError::Execution(format!("failed to write result to stdout: {}", e)))
}

fn cmd_external(ns: &Namespace, args: ExternalArgs) -> Result<String> {
    let payload = read_payload(args.input.as_deref())?;

    let mut call_args = vec![Value::Text(payload), Value::Text(args.program)];
    call_args.extend(args.args.into_iter().map(Value::Text));

    Ok(ns.call(Function::External, &call_args)?.into_string())
}

fn cmd_graphviz(ns: &Namespace, args: GraphvizArgs) -> Result<String> {
    let payload = read_payload(args.input.as_deref())?;
    Ok(ns
        .call(Function::Graphviz, &[Value::Text(payload)])?
        .into_string())
}

/// Read the payload from `input`, or from stdin when no file is given.
fn read_payload(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            ExecError::Argument(format!(
                "failed to read input file '{}': {}",
                path.display(),
                e
            ))
        }),
        None => {
            let mut payload = String::new();
            io::stdin()
                .read_to_string(&mut payload)
                .map_err(|e| ExecError::Argument(format!("failed to read stdin: {}", e)))?;
            Ok(payload)
        }
    }
}
