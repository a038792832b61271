//! Running the shaded benchmark jar and reading what it reports

pub mod results;

pub use results::{read_results, result_file_name, BenchmarkResult};

use crate::process::{ProcessError, ProcessRunner};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

#[derive(Debug, Clone)]
pub struct JmhRunner {
    java: PathBuf,
    runner: ProcessRunner,
}

impl JmhRunner {
    /// Uses `<java_home>/bin/java`
    pub fn new(java_home: &Path, runner: ProcessRunner) -> Self {
        Self {
            java: java_home.join("bin").join("java"),
            runner,
        }
    }

    pub fn java(&self) -> &Path {
        &self.java
    }

    /// `java -jar <jar> -rf json -rff <result_file>`, with JMH's progress on stdout
    pub fn run(&self, jar: &Path, result_file: &Path, dir: &Path) -> Result<ExitStatus, ProcessError> {
        let jar = jar.to_string_lossy();
        let result_file = result_file.to_string_lossy();
        self.runner.status(
            &self.java,
            &["-jar", jar.as_ref(), "-rf", "json", "-rff", result_file.as_ref()],
            dir,
        )
    }
}
