//! Child process spawning and output capture.
//!
//! The payload is written to stdin on its own thread while stdout and stderr
//! are drained on two more, so neither side can fill a pipe and stall the
//! other. All three threads are scoped to [`capture`] and joined before it
//! returns.

use crate::error::{ExecError, Result};
use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::ScopedJoinHandle;
use std::time::{Duration, Instant};

/// Everything a finished child left behind.
#[derive(Debug)]
pub(crate) struct Captured {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Spawn `path` with `args`, feed it `payload`, and wait for it to exit.
///
/// With a `timeout`, the child runs in its own process group. If it is still
/// running when the timeout expires, the whole group is killed, so helpers
/// the tool forked cannot hold the output pipes open, and an
/// `ExecError::Execution` is returned.
pub(crate) fn capture(
    path: &Path,
    args: &[String],
    environment: &BTreeMap<String, String>,
    payload: &str,
    timeout: Option<Duration>,
) -> Result<Captured> {
    let mut command = Command::new(path);
    command
        .args(args)
        .envs(environment)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(unix)]
    if timeout.is_some() {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let mut child = command
        .spawn()
        .map_err(|e| {
            ExecError::Execution(format!("failed to spawn '{}': {}", path.display(), e))
        })?;

    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    std::thread::scope(|s| {
        let writer = s.spawn(move || -> io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(payload.as_bytes())?;
            }
            // Dropping stdin closes the pipe so the child sees EOF.
            Ok(())
        });
        let stdout_reader = s.spawn(move || read_stream(stdout));
        let stderr_reader = s.spawn(move || read_stream(stderr));

        let waited = wait(&mut child, timeout);

        let written = join(writer, "stdin writer")?;
        let stdout = join(stdout_reader, "stdout reader")?;
        let stderr = join(stderr_reader, "stderr reader")?;

        let status = match waited? {
            Some(status) => status,
            None => {
                return Err(ExecError::Execution(format!(
                    "'{}' timed out after {}s and was killed",
                    path.display(),
                    timeout.map(|t| t.as_secs_f64()).unwrap_or_default()
                )));
            }
        };

        // A tool may exit without reading all of its input. Its exit status
        // and stderr then say what happened.
        if let Err(e) = written
            && e.kind() != io::ErrorKind::BrokenPipe
        {
            return Err(ExecError::Execution(format!(
                "failed to write input to '{}': {}",
                path.display(),
                e
            )));
        }

        let stdout = stdout.map_err(|e| {
            ExecError::Execution(format!("failed to read output of '{}': {}", path.display(), e))
        })?;
        let stderr = stderr.map_err(|e| {
            ExecError::Execution(format!(
                "failed to read error output of '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Captured {
            status,
            stdout,
            stderr,
        })
    })
}

/// Wait for the child, killing it if `timeout` elapses first.
///
/// Returns `None` when the child was killed.
fn wait(child: &mut Child, timeout: Option<Duration>) -> Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return child
            .wait()
            .map(Some)
            .map_err(|e| ExecError::Execution(format!("failed to wait for process: {}", e)));
    };

    let start = Instant::now();
    let poll_interval = Duration::from_millis(10);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    tracing::warn!(
                        pid = child.id(),
                        timeout_secs = timeout.as_secs_f64(),
                        "process exceeded timeout, killing"
                    );
                    kill_process(child);
                    return Ok(None);
                }
                std::thread::sleep(poll_interval);
            }
            Err(e) => {
                kill_process(child);
                return Err(ExecError::Execution(format!(
                    "failed to check process status: {}",
                    e
                )));
            }
        }
    }
}

/// Kill a process and reap it.
///
/// On Unix the child leads its own process group (see [`capture`]) and the
/// whole group receives SIGKILL. Elsewhere only the child is terminated.
fn kill_process(child: &mut Child) {
    #[cfg(unix)]
    {
        match libc::pid_t::try_from(child.id()) {
            // Safety: kill(2) with a negative pid signals the process group
            // the child created at spawn; it touches no memory of ours.
            Ok(pgid) => unsafe {
                libc::kill(-pgid, libc::SIGKILL);
            },
            Err(_) => {
                let _ = child.kill();
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = child.kill();
    }
    let _ = child.wait();
}

fn read_stream<R: Read>(handle: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        h.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

fn join<T>(handle: ScopedJoinHandle<'_, T>, what: &str) -> Result<T> {
    handle
        .join()
        .map_err(|_| ExecError::Execution(format!("{} thread panicked", what)))
}

/// Describe a non-success exit for an error message.
pub(crate) fn describe_status(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => format!("terminated abnormally ({})", status),
    }
}
