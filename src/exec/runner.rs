//! The `External` template function: run a program over a payload.

use super::invocation::Invocation;
use super::process::{self, Captured};
use crate::error::{ExecError, Result};
use crate::markup::SafeHtml;
use crate::resolve::{PathResolver, SearchPath};
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Runs external programs on behalf of templates.
///
/// A runner holds only immutable settings, so one instance can serve any
/// number of concurrent calls. Each call resolves its program, spawns one
/// child, and owns that child's buffers until it returns.
#[derive(Clone)]
pub struct CommandRunner {
    resolver: Arc<dyn PathResolver>,
    timeout: Option<Duration>,
    environment: BTreeMap<String, String>,
}

impl CommandRunner {
    /// A runner that resolves programs through the `PATH` environment
    /// variable, with no timeout.
    pub fn new() -> Self {
        Self::with_resolver(SearchPath::from_env())
    }

    /// A runner that resolves programs through `resolver`.
    pub fn with_resolver(resolver: impl PathResolver + 'static) -> Self {
        Self {
            resolver: Arc::new(resolver),
            timeout: None,
            environment: BTreeMap::new(),
        }
    }

    /// Kill children that run longer than `timeout`. `None` waits forever.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a variable to every child's environment.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    /// Run `args[1]` with `args[2..]`, feeding it `args[0]` on stdin.
    ///
    /// Returns the program's complete stdout as trusted markup. Fails with
    /// `ExecError::Argument` on bad arguments, `ExecError::Resolution` if the
    /// program cannot be found, and `ExecError::Execution` if it cannot be
    /// run or exits unsuccessfully.
    pub fn run(&self, args: &[Value]) -> Result<SafeHtml> {
        let invocation = Invocation::from_args(args)?;
        self.run_invocation(&invocation)
    }

    /// Run an already coerced invocation.
    pub fn run_invocation(&self, invocation: &Invocation) -> Result<SafeHtml> {
        let path = self.resolver.resolve(&invocation.program)?;

        tracing::debug!(
            command = %invocation.command_line(),
            path = %path.display(),
            payload_bytes = invocation.payload.len(),
            "running external command"
        );

        let Captured {
            status,
            stdout,
            stderr,
        } = process::capture(
            &path,
            &invocation.args,
            &self.environment,
            &invocation.payload,
            self.timeout,
        )?;

        if !status.success() {
            let stdout = String::from_utf8_lossy(&stdout);
            let stderr = String::from_utf8_lossy(&stderr);
            let detail = if stderr.trim().is_empty() {
                stdout.trim()
            } else {
                stderr.trim()
            };

            tracing::debug!(
                command = %invocation.command_line(),
                status = %status,
                "external command failed"
            );

            return Err(ExecError::Execution(format!(
                "'{}' failed ({}): {}",
                invocation.command_line(),
                process::describe_status(&status),
                detail
            )));
        }

        let output = String::from_utf8(stdout).map_err(|e| {
            ExecError::Execution(format!(
                "'{}' produced output that is not valid UTF-8: {}",
                invocation.command_line(),
                e.utf8_error()
            ))
        })?;

        Ok(SafeHtml::new(output))
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRunner")
            .field("timeout", &self.timeout)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_support::{tool_dirs, write_script};
    use tempfile::TempDir;

    fn runner(dir: &TempDir) -> CommandRunner {
        CommandRunner::with_resolver(SearchPath::from_dirs(tool_dirs(dir.path())))
    }

    #[test]
    fn test_cat_is_identity() {
        let dir = TempDir::new().unwrap();
        let payload = "line one\n<p>two & three</p>\n\tunicode: \u{00e9}\u{4e2d}";

        let out = runner(&dir)
            .run(&[Value::from(payload), Value::from("cat")])
            .unwrap();
        assert_eq!(out.as_str(), payload);
    }

    #[test]
    fn test_empty_payload_and_output() {
        let dir = TempDir::new().unwrap();
        let out = runner(&dir)
            .run(&[Value::from(""), Value::from("cat")])
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_arguments_passed_in_order() {
        let dir = TempDir::new().unwrap();
        write_script(dir.path(), "args", "for a in \"$@\"; do echo \"[$a]\"; done");

        let out = runner(&dir)
            .run(&[
                Value::Null,
                Value::from("args"),
                Value::from("first"),
                Value::Int(2),
                Value::Bool(false),
                Value::from("with space"),
            ])
            .unwrap();
        assert_eq!(out.as_str(), "[first]\n[2]\n[false]\n[with space]\n");
    }

    #[test]
    fn test_output_is_not_trimmed() {
        let dir = TempDir::new().unwrap();
        write_script(dir.path(), "padded", "printf '  padded  \\n\\n'");

        let out = runner(&dir)
            .run(&[Value::from(""), Value::from("padded")])
            .unwrap();
        assert_eq!(out.as_str(), "  padded  \n\n");
    }

    #[test]
    fn test_stderr_discarded_on_success() {
        let dir = TempDir::new().unwrap();
        write_script(dir.path(), "noisy", "echo warning >&2; echo result");

        let out = runner(&dir)
            .run(&[Value::from(""), Value::from("noisy")])
            .unwrap();
        assert_eq!(out.as_str(), "result\n");
    }

    #[test]
    fn test_nonexistent_command_is_resolution_error() {
        let dir = TempDir::new().unwrap();
        let err = runner(&dir)
            .run(&[Value::from("x"), Value::from("nonexistent_command_xyz_123")])
            .unwrap_err();
        assert!(matches!(err, ExecError::Resolution { .. }));
    }

    #[test]
    fn test_too_few_arguments() {
        let dir = TempDir::new().unwrap();
        let err = runner(&dir).run(&[Value::from("x")]).unwrap_err();
        assert!(matches!(err, ExecError::Argument(_)));
    }

    #[test]
    fn test_nonzero_exit_includes_stderr() {
        let dir = TempDir::new().unwrap();
        write_script(
            dir.path(),
            "broken",
            "echo partial; echo 'syntax error in line 1' >&2; exit 1",
        );

        let err = runner(&dir)
            .run(&[Value::from("x"), Value::from("broken"), Value::from("-v")])
            .unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ExecError::Execution(_)));
        assert!(msg.contains("'broken -v' failed (exit code 1)"), "{}", msg);
        assert!(msg.contains("syntax error in line 1"), "{}", msg);
        assert!(!msg.contains("partial"), "{}", msg);
    }

    #[test]
    fn test_nonzero_exit_falls_back_to_stdout() {
        let dir = TempDir::new().unwrap();
        write_script(dir.path(), "quiet", "echo 'only on stdout'; exit 2");

        let err = runner(&dir)
            .run(&[Value::from(""), Value::from("quiet")])
            .unwrap_err();
        assert!(err.to_string().contains("only on stdout"));
    }

    #[test]
    fn test_invalid_utf8_output_is_execution_error() {
        let dir = TempDir::new().unwrap();
        write_script(dir.path(), "binary", "printf '\\377\\376'");

        let err = runner(&dir)
            .run(&[Value::from(""), Value::from("binary")])
            .unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_timeout_is_execution_error() {
        let dir = TempDir::new().unwrap();
        write_script(dir.path(), "hang", "exec sleep 10");

        let err = runner(&dir)
            .timeout(Some(Duration::from_millis(200)))
            .run(&[Value::from(""), Value::from("hang")])
            .unwrap_err();
        assert!(matches!(err, ExecError::Execution(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_timeout_with_forked_child_returns_promptly() {
        let dir = TempDir::new().unwrap();
        write_script(dir.path(), "slow", "sleep 5");

        let started = std::time::Instant::now();
        let err = runner(&dir)
            .timeout(Some(Duration::from_millis(200)))
            .run(&[Value::from(""), Value::from("slow")])
            .unwrap_err();
        assert!(err.to_string().contains("timed out"), "{}", err);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_failure_with_unread_payload_reports_stderr() {
        let dir = TempDir::new().unwrap();
        write_script(
            dir.path(),
            "reject",
            "echo 'Format: \"bogus\" not recognized' >&2; exit 1",
        );

        let payload = "x".repeat(4 * 1024 * 1024);
        let err = runner(&dir)
            .run(&[Value::from(payload), Value::from("reject")])
            .unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ExecError::Execution(_)));
        assert!(msg.contains("'reject' failed (exit code 1)"), "{}", msg);
        assert!(msg.contains("Format: \"bogus\" not recognized"), "{}", msg);
        assert!(!msg.contains("Broken pipe"), "{}", msg);
    }

    #[test]
    fn test_env_reaches_child() {
        let dir = TempDir::new().unwrap();
        write_script(dir.path(), "show_env", "printf '%s' \"$GREETING\"");

        let out = runner(&dir)
            .env("GREETING", "hello")
            .run(&[Value::from(""), Value::from("show_env")])
            .unwrap();
        assert_eq!(out.as_str(), "hello");
    }

    #[test]
    fn test_concurrent_calls_do_not_interfere() {
        let dir = TempDir::new().unwrap();
        write_script(dir.path(), "upper", "tr 'a-z' 'A-Z'");
        let runner = runner(&dir);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let runner = &runner;
                    s.spawn(move || {
                        let payload = format!("payload number {}", i);
                        let program = if i % 2 == 0 { "cat" } else { "upper" };
                        let out = runner
                            .run(&[Value::from(payload.clone()), Value::from(program)])
                            .unwrap();
                        (payload, program, out)
                    })
                })
                .collect();

            for handle in handles {
                let (payload, program, out) = handle.join().unwrap();
                let expected = if program == "cat" {
                    payload
                } else {
                    payload.to_uppercase()
                };
                assert_eq!(out.as_str(), expected);
            }
        });
    }
}
