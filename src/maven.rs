//! The Maven executable as an external collaborator

use crate::process::{ProcessError, ProcessRunner};
use crate::resolver::{LocalRepositoryLocator, ResolveError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// Line Maven prints when every module built
pub const BUILD_SUCCESS_MARKER: &str = "[INFO] BUILD SUCCESS";

#[derive(Debug, Error)]
pub enum MavenError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("The {stage} failed")]
    BuildFailed { stage: &'static str, output: String },

    #[error("No benchmark jars found in {0:?}")]
    NoArtifacts(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Maven {
    bin: PathBuf,
    runner: ProcessRunner,
}

impl Maven {
    pub fn new(bin: impl Into<PathBuf>, runner: ProcessRunner) -> Self {
        Self {
            bin: bin.into(),
            runner,
        }
    }

    /// Runs `mvn --batch-mode <goals> -DskipTests` and checks for the success marker.
    ///
    /// The exit code is not trusted on its own; the full output is logged on failure.
    pub fn build(&self, dir: &Path, stage: &'static str, goals: &[&str]) -> Result<String, MavenError> {
        let mut args = vec!["--batch-mode"];
        args.extend_from_slice(goals);
        args.push("-DskipTests");

        let out = self.runner.output(&self.bin, &args, dir)?;
        if out.stdout.contains(BUILD_SUCCESS_MARKER) {
            info!(stage, "Maven build succeeded");
            return Ok(out.stdout);
        }

        for line in out.stdout.lines() {
            error!(stage, "{}", line);
        }
        Err(MavenError::BuildFailed {
            stage,
            output: out.stdout,
        })
    }

    pub fn install(&self, project: &Path) -> Result<String, MavenError> {
        self.build(project, "project build", &["clean", "install"])
    }

    pub fn package(&self, project: &Path) -> Result<String, MavenError> {
        self.build(project, "benchmark build", &["clean", "package"])
    }
}

/// Value line of `help:evaluate`, skipping Maven's `[LEVEL]` chatter
pub fn parse_evaluate_output(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('['))
        .last()
        .map(PathBuf::from)
}

impl Maven {
    /// `settings.localRepository` as Maven resolves it from inside `project`,
    /// so project-level `.mvn` settings apply
    pub fn local_repository(&self, project: &Path) -> Result<PathBuf, ResolveError> {
        let out = self
            .runner
            .output(
                &self.bin,
                &[
                    "--batch-mode",
                    "help:evaluate",
                    "-Dexpression=settings.localRepository",
                ],
                project,
            )
            .map_err(|e| ResolveError::Query(e.to_string()))?;

        parse_evaluate_output(&out.stdout).ok_or_else(|| {
            ResolveError::Query(format!(
                "{} printed no repository path (exit status {})",
                self.bin.display(),
                out.status
            ))
        })
    }

    pub fn locator_for(&self, project: impl Into<PathBuf>) -> ProjectRepositoryLocator {
        ProjectRepositoryLocator {
            maven: self.clone(),
            project: project.into(),
        }
    }
}

/// Asks Maven for the local repository of one project
#[derive(Debug, Clone)]
pub struct ProjectRepositoryLocator {
    maven: Maven,
    project: PathBuf,
}

impl LocalRepositoryLocator for ProjectRepositoryLocator {
    fn locate(&self) -> Result<PathBuf, ResolveError> {
        self.maven.local_repository(&self.project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_evaluate_output() {
        let stdout = "[INFO] Scanning for projects...\n\
                      [INFO] --- maven-help-plugin:3.4.0:evaluate (default-cli) ---\n\
                      [WARNING] Something\n\
                      /home/dev/.m2/repository\n\
                      [INFO] BUILD SUCCESS\n";
        assert_eq!(
            parse_evaluate_output(stdout),
            Some(PathBuf::from("/home/dev/.m2/repository"))
        );
    }

    #[test]
    fn test_parse_evaluate_output_empty() {
        assert_eq!(parse_evaluate_output("[INFO] BUILD FAILURE\n\n"), None);
    }

    #[cfg(unix)]
    mod with_fake_maven {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn fake_mvn(dir: &TempDir, script: &str) -> PathBuf {
            let path = dir.path().join("mvn");
            fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_build_success() {
            let dir = TempDir::new().unwrap();
            let mvn = Maven::new(fake_mvn(&dir, "echo '[INFO] BUILD SUCCESS'"), ProcessRunner::default());
            assert!(mvn.install(dir.path()).is_ok());
        }

        #[test]
        fn test_build_failure_keeps_output() {
            let dir = TempDir::new().unwrap();
            let mvn = Maven::new(
                fake_mvn(&dir, "echo '[ERROR] COMPILATION ERROR'; echo '[INFO] BUILD FAILURE'"),
                ProcessRunner::default(),
            );
            match mvn.package(dir.path()).unwrap_err() {
                MavenError::BuildFailed { stage, output } => {
                    assert_eq!(stage, "benchmark build");
                    assert!(output.contains("COMPILATION ERROR"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_zero_exit_without_marker_is_failure() {
            let dir = TempDir::new().unwrap();
            let mvn = Maven::new(fake_mvn(&dir, "echo done; exit 0"), ProcessRunner::default());
            assert!(matches!(
                mvn.install(dir.path()),
                Err(MavenError::BuildFailed { .. })
            ));
        }

        #[test]
        fn test_locate_local_repository() {
            let dir = TempDir::new().unwrap();
            let mvn = Maven::new(
                fake_mvn(&dir, "echo '[INFO] Scanning'; echo /opt/m2/repository"),
                ProcessRunner::default(),
            );
            assert_eq!(
                mvn.locator_for(dir.path()).locate().unwrap(),
                PathBuf::from("/opt/m2/repository")
            );
        }

        #[test]
        fn test_locate_uses_project_maven_config() {
            let tools = TempDir::new().unwrap();
            let project = TempDir::new().unwrap();
            fs::create_dir_all(project.path().join(".mvn")).unwrap();
            fs::write(project.path().join(".mvn/maven.config"), "/project/local/repo\n").unwrap();

            let mvn = Maven::new(
                fake_mvn(
                    &tools,
                    "if [ -f .mvn/maven.config ]; then cat .mvn/maven.config; \
                     else echo /home/default/.m2/repository; fi",
                ),
                ProcessRunner::default(),
            );

            assert_eq!(
                mvn.locator_for(project.path()).locate().unwrap(),
                PathBuf::from("/project/local/repo")
            );
            assert_eq!(
                mvn.locator_for(tools.path()).locate().unwrap(),
                PathBuf::from("/home/default/.m2/repository")
            );
        }

        #[test]
        fn test_locate_without_output_fails() {
            let dir = TempDir::new().unwrap();
            let mvn = Maven::new(fake_mvn(&dir, "echo '[ERROR] no network'; exit 1"), ProcessRunner::default());
            assert!(matches!(
                mvn.locator_for(dir.path()).locate(),
                Err(ResolveError::Query(_))
            ));
        }
    }
}
