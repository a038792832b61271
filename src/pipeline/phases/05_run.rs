use crate::jmh::{read_results, result_file_name};
use crate::maven::MavenError;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::WorkflowPhase;
use anyhow::{Context, Result};
use std::fs;
use tracing::{info, warn};

/// Runs every shaded benchmark jar, one JSON result file per jar
pub struct RunPhase;

impl WorkflowPhase for RunPhase {
    fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let artifacts = context.project.artifacts()?;
        if artifacts.is_empty() {
            return Err(MavenError::NoArtifacts(context.project.target_dir()).into());
        }

        let output = &context.config.output_dir;
        fs::create_dir_all(output).context(format!("Failed to create {:?}", output))?;

        let project_name = context.config.project_name();
        info!(count = artifacts.len(), "Running benchmarks...");

        for (index, jar) in artifacts.iter().enumerate() {
            let result_file = output.join(result_file_name(&project_name, index));
            let status = context
                .jmh
                .run(jar, &result_file, context.project.dir())?;
            if !status.success() {
                warn!(jar = %jar.display(), %status, "JMH exited with a failure status");
            }

            if !result_file.is_file() {
                warn!(path = %result_file.display(), "JMH wrote no result file");
                continue;
            }

            match read_results(&result_file) {
                Ok(results) => {
                    for result in &results {
                        let metric = &result.primary_metric;
                        info!(
                            benchmark = %result.benchmark,
                            mode = %result.mode,
                            error = ?metric.error(),
                            "{} {}",
                            metric.score,
                            metric.score_unit
                        );
                    }
                }
                Err(e) => warn!(path = %result_file.display(), error = %e, "Unreadable result file"),
            }
            context.result_files.push(result_file);
        }
        Ok(())
    }
}
