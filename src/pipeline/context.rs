//! Pipeline context for the run's collaborators and results

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AutobenchConfig;
use crate::fs::{FileSystem, RealFileSystem};
use crate::jmh::JmhRunner;
use crate::maven::Maven;
use crate::process::ProcessRunner;
use crate::reconcile::ReconciledDescriptor;
use crate::resolver::DependencyResolver;
use crate::synth::SyntheticProject;

/// Context that owns all long-lived pipeline dependencies
pub struct PipelineContext {
    pub config: AutobenchConfig,

    pub maven: Maven,

    pub jmh: JmhRunner,

    /// `<target>/art-jmh-env`
    pub project: SyntheticProject,

    /// Local repository lookups, backed by Maven's own settings
    pub resolver: DependencyResolver,

    /// Filled by the benchmark build phase
    pub reconciled: Option<ReconciledDescriptor>,

    /// JSON files written by JMH, in run order
    pub result_files: Vec<PathBuf>,
}

impl PipelineContext {
    pub fn new(config: AutobenchConfig, runner: ProcessRunner) -> Self {
        let file_system: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let locator = Maven::new(&config.toolchain.maven_bin, runner.clone())
            .locator_for(&config.target_dir);
        let resolver = DependencyResolver::new(file_system, Box::new(locator));
        Self::with_resolver(config, runner, resolver)
    }

    /// Same as [`new`](Self::new) with a caller-provided resolver
    pub fn with_resolver(
        config: AutobenchConfig,
        runner: ProcessRunner,
        resolver: DependencyResolver,
    ) -> Self {
        let maven = Maven::new(&config.toolchain.maven_bin, runner.clone());
        let jmh = JmhRunner::new(&config.toolchain.java_home, runner);
        let project = SyntheticProject::new(&config.target_dir);
        Self {
            config,
            maven,
            jmh,
            project,
            resolver,
            reconciled: None,
            result_files: Vec::new(),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::Toolchain;
    use crate::pipeline::test_support::fake_tool;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_local_repository_is_asked_from_the_target() {
        let tools = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::create_dir_all(project.path().join(".mvn")).unwrap();
        fs::write(project.path().join(".mvn/maven.config"), "/project/local/repo\n").unwrap();
        let mvn = fake_tool(
            &tools,
            "mvn",
            "if [ -f .mvn/maven.config ]; then cat .mvn/maven.config; else echo /home/default/.m2/repository; fi",
        );

        let toolchain = Toolchain {
            maven_bin: mvn,
            java_home: tools.path().to_path_buf(),
        };
        let config = AutobenchConfig::new(toolchain, project.path().to_path_buf());
        let context = PipelineContext::new(config, ProcessRunner::default());

        assert_eq!(
            context.resolver.local_repository().unwrap(),
            Path::new("/project/local/repo")
        );
    }
}
