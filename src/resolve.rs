//! Executable resolution against a search path.
//!
//! Resolution is a seam: the runner asks a [`PathResolver`] for the program's
//! location before every spawn. The default [`SearchPath`] walks a list of
//! directories the way a shell does; tests inject their own directory list.

use crate::error::{ExecError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Locates a runnable program by name.
pub trait PathResolver: Send + Sync {
    /// Resolve `program` to the path that should be spawned.
    ///
    /// Returns `ExecError::Resolution` when nothing runnable matches.
    fn resolve(&self, program: &str) -> Result<PathBuf>;
}

/// Ordered list of directories to search for executables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Build a search path from the `PATH` environment variable.
    pub fn from_env() -> Self {
        match std::env::var_os("PATH") {
            Some(path) => Self::parse(path),
            None => Self::default(),
        }
    }

    /// Build a search path from a platform-separated list (`:` on Unix,
    /// `;` on Windows). Empty entries are skipped.
    pub fn parse(list: impl Into<OsString>) -> Self {
        let list = list.into();
        Self {
            dirs: std::env::split_paths(&list)
                .filter(|dir| !dir.as_os_str().is_empty())
                .collect(),
        }
    }

    /// Build a search path from explicit directories.
    pub fn from_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl PathResolver for SearchPath {
    fn resolve(&self, program: &str) -> Result<PathBuf> {
        if program.is_empty() {
            return Err(ExecError::Resolution {
                program: String::new(),
                reason: "executable name is empty".to_string(),
            });
        }

        // Names with a directory component are used as given.
        if has_separator(program) {
            return find_executable(Path::new(program)).ok_or_else(|| ExecError::Resolution {
                program: program.to_string(),
                reason: "path does not point to an executable file".to_string(),
            });
        }

        for dir in &self.dirs {
            if let Some(found) = find_executable(&dir.join(program)) {
                tracing::debug!(program, path = %found.display(), "resolved executable");
                return Ok(found);
            }
        }

        Err(ExecError::Resolution {
            program: program.to_string(),
            reason: format!(
                "no executable of that name in search path ({} directories searched)",
                self.dirs.len()
            ),
        })
    }
}

fn has_separator(program: &str) -> bool {
    program.contains('/') || (cfg!(windows) && program.contains('\\'))
}

#[cfg(unix)]
fn find_executable(candidate: &Path) -> Option<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(candidate).ok()?;
    if metadata.is_file() && metadata.permissions().mode() & 0o111 != 0 {
        Some(candidate.to_path_buf())
    } else {
        None
    }
}

#[cfg(windows)]
fn find_executable(candidate: &Path) -> Option<PathBuf> {
    let is_file = |p: &Path| std::fs::metadata(p).map(|m| m.is_file()).unwrap_or(false);

    let pathext = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
    let exts: Vec<String> = pathext
        .split(';')
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase())
        .collect();

    let has_known_ext = candidate
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| exts.iter().any(|known| known.trim_start_matches('.') == e.to_lowercase()));

    if has_known_ext && is_file(candidate) {
        return Some(candidate.to_path_buf());
    }

    exts.iter()
        .map(|ext| {
            let mut name = candidate.as_os_str().to_os_string();
            name.push(ext);
            PathBuf::from(name)
        })
        .find(|p| is_file(p.as_path()))
}
