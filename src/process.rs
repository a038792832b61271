//! Blocking child-process execution
//!
//! Every child inherits the run log as its stderr, so compiler and JVM
//! diagnostics end up in the same transcript as our own events.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to launch {program:?}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    stderr_log: Option<Arc<File>>,
}

impl ProcessRunner {
    /// Children write stderr to `stderr_log` when given, else to our stderr
    pub fn new(stderr_log: Option<File>) -> Self {
        Self {
            stderr_log: stderr_log.map(Arc::new),
        }
    }

    fn stderr(&self) -> Stdio {
        match &self.stderr_log {
            Some(file) => match file.try_clone() {
                Ok(clone) => Stdio::from(clone),
                Err(e) => {
                    warn!(error = %e, "Could not share the log file with a child process");
                    Stdio::inherit()
                }
            },
            None => Stdio::inherit(),
        }
    }

    fn command(&self, program: &Path, args: &[&str], dir: &Path) -> Command {
        info!(
            dir = %dir.display(),
            "$> {} {}",
            program.display(),
            args.join(" ")
        );
        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stderr(self.stderr());
        command
    }

    /// Runs to completion and captures stdout
    pub fn output(
        &self,
        program: &Path,
        args: &[&str],
        dir: &Path,
    ) -> Result<CommandOutput, ProcessError> {
        let output = self
            .command(program, args, dir)
            .stdout(Stdio::piped())
            .output()
            .map_err(|source| ProcessError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        debug!(status = %output.status, bytes = output.stdout.len(), "Process finished");
        Ok(CommandOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    /// Runs to completion with stdout passed through to the terminal
    pub fn status(
        &self,
        program: &Path,
        args: &[&str],
        dir: &Path,
    ) -> Result<ExitStatus, ProcessError> {
        let status = self
            .command(program, args, dir)
            .stdout(Stdio::inherit())
            .status()
            .map_err(|source| ProcessError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        debug!(%status, "Process finished");
        Ok(status)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_output_captures_stdout() {
        let dir = TempDir::new().unwrap();
        let runner = ProcessRunner::default();

        let out = runner
            .output(Path::new("sh"), &["-c", "echo hello"], dir.path())
            .unwrap();
        assert!(out.status.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn test_stderr_goes_to_log() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("run.log");
        let log = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .unwrap();
        let runner = ProcessRunner::new(Some(log));

        let status = runner
            .status(Path::new("sh"), &["-c", "echo oops >&2; exit 3"], dir.path())
            .unwrap();
        assert_eq!(status.code(), Some(3));
        assert_eq!(fs::read_to_string(log_path).unwrap().trim(), "oops");
    }

    #[test]
    fn test_missing_program() {
        let dir = TempDir::new().unwrap();
        let err = ProcessRunner::default()
            .output(Path::new("/definitely/not/a/program"), &[], dir.path())
            .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }
}
