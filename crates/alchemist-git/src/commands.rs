//! Git command execution wrappers.
//!
//! Provides a thin wrapper around `git` subprocess invocation so that the
//! rest of the codebase does not need to deal with `std::process::Command`
//! directly.

use std::ffi::OsStr;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Name of the git executable on Unix-like systems.
pub const GIT_EXE: &str = "git";

/// Name of the git executable on Windows.
pub const GIT_EXE_WINDOWS: &str = "git.exe";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when running git commands.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be found or spawned.
    #[error("failed to execute git: {0}")]
    SpawnError(#[from] std::io::Error),

    /// The git command exited with a non-zero status.
    #[error("exit status {}", exit_label(.code))]
    CommandFailed {
        /// The exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        /// Combined stdout and stderr of the failed command.
        output: String,
    },
}

impl GitError {
    /// The captured process output, if the command ran at all.
    pub fn output(&self) -> Option<&str> {
        match self {
            GitError::CommandFailed { output, .. } => Some(output),
            GitError::SpawnError(_) => None,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

/// A specialized `Result` type for git operations.
pub type Result<T> = std::result::Result<T, GitError>;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Execute a `git` command with the given arguments and working directory.
///
/// Returns the combined output of the command on success. Stdout and stderr
/// share one pipe, so lines appear in the order git wrote them. Git reports
/// progress for `clone`, `push` and friends on stderr.
///
/// # Errors
///
/// Returns [`GitError::SpawnError`] if `git` cannot be found or `cwd` does not
/// exist, or [`GitError::CommandFailed`] if the command exits with a non-zero
/// status. The failure carries the combined output as well.
///
/// # Examples
///
/// ```no_run
/// use alchemist_git::commands::git_command;
/// use std::path::Path;
///
/// let log = git_command(&["log", "--oneline"], Path::new(".")).unwrap();
/// println!("{log}");
/// ```
pub fn git_command<S: AsRef<OsStr>>(args: &[S], cwd: &Path) -> Result<String> {
    let (mut reader, writer) = io::pipe()?;
    let mut command = Command::new(GIT_EXE);
    command
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(writer.try_clone()?)
        .stderr(writer);
    let mut child = command.spawn()?;
    // The command holds the parent's write ends; reading stops at EOF only
    // after they are closed.
    drop(command);

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let status = child.wait()?;
    let combined = String::from_utf8_lossy(&bytes).into_owned();

    if !status.success() {
        return Err(GitError::CommandFailed {
            code: status.code(),
            output: combined,
        });
    }

    Ok(combined)
}

/// Returns `true` if `name` is the git executable name on any platform.
pub fn is_git_executable(name: &str) -> bool {
    name == GIT_EXE || name == GIT_EXE_WINDOWS
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
