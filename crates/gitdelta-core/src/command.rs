//! The contract for running external commands.
//!
//! gitdelta never spawns processes from its library crates. It hands a
//! working directory and a command line to a [`CommandRunner`] and consumes
//! the returned [`CommandOutput`].

use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Raw result of one external command.
///
/// `success` is `false` when the command timed out, could not be spawned,
/// or exited with a non-zero status.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use gitdelta_core::CommandOutput;
///
/// let out = CommandOutput::succeeded(b"git version 2.43.0\n".to_vec(), Duration::from_millis(3));
/// assert!(out.success);
/// assert_eq!(out.stdout_text().trim(), "git version 2.43.0");
///
/// let failed = CommandOutput::failed(Duration::from_secs(60));
/// assert!(!failed.success);
/// assert!(failed.stdout.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Bytes written to standard output.
    pub stdout: Vec<u8>,
    /// Bytes written to standard error.
    pub stderr: Vec<u8>,
    /// Whether the command finished in time with exit status zero.
    pub success: bool,
    /// Wall-clock time spent waiting for the command.
    pub elapsed: Duration,
}

impl CommandOutput {
    pub fn succeeded(stdout: Vec<u8>, elapsed: Duration) -> Self {
        Self {
            stdout,
            stderr: Vec::new(),
            success: true,
            elapsed,
        }
    }

    pub fn failed(elapsed: Duration) -> Self {
        Self {
            success: false,
            elapsed,
            ..Self::default()
        }
    }

    /// Standard output decoded lossily as UTF-8.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Standard error decoded lossily as UTF-8.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Runs a command line in a working directory.
///
/// Implementations enforce their own timeout and report it as a failed
/// [`CommandOutput`], never as a partial result.
pub trait CommandRunner {
    fn run(&self, dir: &Path, command: &str) -> impl Future<Output = CommandOutput> + Send;
}

/// Split a command line into program and arguments on whitespace.
///
/// Returns `None` for a blank command line.
///
/// # Examples
///
/// ```
/// use gitdelta_core::command::split_command;
///
/// let (program, args) = split_command("git diff --stat a...b").unwrap();
/// assert_eq!(program, "git");
/// assert_eq!(args, vec!["diff", "--stat", "a...b"]);
/// assert!(split_command("   ").is_none());
/// ```
pub fn split_command(command: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// Append one argument to a configured command line.
pub fn with_argument(command: &str, argument: &str) -> String {
    format!("{} {}", command.trim_end(), argument)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lossy_text_survives_invalid_utf8() {
        let out = CommandOutput::succeeded(vec![b'o', b'k', 0xff], Duration::ZERO);
        assert!(out.stdout_text().starts_with("ok"));
        assert_eq!(out.stderr_text(), "");
    }

    #[test]
    fn split_collapses_repeated_whitespace() {
        let (program, args) = split_command("  git   log\t--parents  ").unwrap();
        assert_eq!(program, "git");
        assert_eq!(args, vec!["log", "--parents"]);
    }

    #[test]
    fn with_argument_appends_once() {
        assert_eq!(with_argument("git log --parents ", "main"), "git log --parents main");
    }
}
