//! Error types for tplexec.
//!
//! Uses thiserror for derive macros. Each variant names the stage that failed
//! so template authors can tell a missing tool from a tool that crashed.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for template function calls.
#[derive(Error, Debug)]
pub enum ExecError {
    /// A required argument is missing or has no text form.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The executable could not be located on the search path.
    #[error("executable '{program}' not found: {reason}")]
    Resolution { program: String, reason: String },

    /// The process could not be run, timed out, or exited unsuccessfully.
    #[error("execution failed: {0}")]
    Execution(String),

    /// The tool succeeded but its output was not what the caller expected.
    #[error("unexpected tool output: {0}")]
    OutputFormat(String),

    /// Configuration could not be read or failed validation.
    #[error("{0}")]
    Config(String),
}

impl ExecError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecError::Argument(_) => exit_codes::USER_ERROR,
            ExecError::Resolution { .. } => exit_codes::RESOLUTION_FAILURE,
            ExecError::Execution(_) => exit_codes::EXECUTION_FAILURE,
            ExecError::OutputFormat(_) => exit_codes::OUTPUT_FORMAT_FAILURE,
            ExecError::Config(_) => exit_codes::USER_ERROR,
        }
    }
}

/// Result type alias for tplexec operations.
pub type Result<T> = std::result::Result<T, ExecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_error_has_correct_exit_code() {
        let err = ExecError::Argument("missing payload".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn resolution_error_has_correct_exit_code() {
        let err = ExecError::Resolution {
            program: "dot".to_string(),
            reason: "no match in search path".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::RESOLUTION_FAILURE);
    }

    #[test]
    fn execution_error_has_correct_exit_code() {
        let err = ExecError::Execution("exit code 1".to_string());
        assert_eq!(err.exit_code(), exit_codes::EXECUTION_FAILURE);
    }

    #[test]
    fn output_format_error_has_correct_exit_code() {
        let err = ExecError::OutputFormat("no svg".to_string());
        assert_eq!(err.exit_code(), exit_codes::OUTPUT_FORMAT_FAILURE);
    }

    #[test]
    fn error_messages_name_the_stage() {
        let err = ExecError::Resolution {
            program: "dot".to_string(),
            reason: "no match in search path".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "executable 'dot' not found: no match in search path"
        );

        let err = ExecError::OutputFormat("no <svg> element in dot output".to_string());
        assert_eq!(
            err.to_string(),
            "unexpected tool output: no <svg> element in dot output"
        );
    }
}
