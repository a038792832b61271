use super::context::PipelineContext;
use super::phase_trait::WorkflowPhase;
use super::phases::{
    benchmark_build::BenchmarkBuildPhase, prepare::PreparePhase, project_build::ProjectBuildPhase,
    reset::ResetPhase, run::RunPhase,
};
use crate::config::AutobenchConfig;
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct PipelineOrchestrator;

impl PipelineOrchestrator {
    /// Phases for this configuration, in run order
    pub fn phases(config: &AutobenchConfig) -> Vec<(Box<dyn WorkflowPhase>, &'static str)> {
        if config.reuse_artifacts {
            return vec![(Box::new(RunPhase), "RunPhase")];
        }

        let mut phases: Vec<(Box<dyn WorkflowPhase>, &'static str)> = vec![
            (Box::new(ResetPhase), "ResetPhase"),
            (Box::new(ProjectBuildPhase), "ProjectBuildPhase"),
            (Box::new(PreparePhase), "PreparePhase"),
        ];
        if !config.testing_mode {
            phases.push((Box::new(BenchmarkBuildPhase), "BenchmarkBuildPhase"));
            phases.push((Box::new(RunPhase), "RunPhase"));
        }
        phases
    }

    pub fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let start = Instant::now();
        info!(
            "Starting procedure for: {}",
            context.config.target_dir.display()
        );

        for (phase, phase_name) in Self::phases(&context.config) {
            info!("Phase: {}", phase_name);

            let phase_start = Instant::now();
            phase
                .execute(context)
                .with_context(|| format!("Phase {} failed", phase_name))?;

            debug!(elapsed = ?phase_start.elapsed(), "Phase {} complete", phase_name);
        }

        if context.config.testing_mode {
            warn!("Skipping benchmark because of testing option. Everything seems to work fine.");
        }
        info!(
            results = context.result_files.len(),
            elapsed = ?start.elapsed(),
            "All done"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::context_for;
    use std::fs;
    use tempfile::TempDir;

    fn names(config: &AutobenchConfig) -> Vec<&'static str> {
        PipelineOrchestrator::phases(config)
            .into_iter()
            .map(|(_, name)| name)
            .collect()
    }

    #[test]
    fn test_full_run_phases() {
        let dir = TempDir::new().unwrap();
        let context = context_for(dir.path());
        assert_eq!(
            names(&context.config),
            vec![
                "ResetPhase",
                "ProjectBuildPhase",
                "PreparePhase",
                "BenchmarkBuildPhase",
                "RunPhase"
            ]
        );
    }

    #[test]
    fn test_testing_mode_stops_after_staging() {
        let dir = TempDir::new().unwrap();
        let mut context = context_for(dir.path());
        context.config.testing_mode = true;
        assert_eq!(
            names(&context.config),
            vec!["ResetPhase", "ProjectBuildPhase", "PreparePhase"]
        );
    }

    #[test]
    fn test_reuse_artifacts_only_runs() {
        let dir = TempDir::new().unwrap();
        let mut context = context_for(dir.path());
        context.config.reuse_artifacts = true;
        assert_eq!(names(&context.config), vec!["RunPhase"]);
    }

    #[test]
    fn test_failure_names_the_phase() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("art-jmh-env")).unwrap();
        let mut context = context_for(dir.path());

        let err = PipelineOrchestrator.execute(&mut context).unwrap_err();

        assert_eq!(err.to_string(), "Phase ProjectBuildPhase failed");
        assert!(!dir.path().join("art-jmh-env").exists());
    }
}
