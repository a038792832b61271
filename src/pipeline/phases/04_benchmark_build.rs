use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::WorkflowPhase;
use crate::pom::DescriptorScanner;
use crate::reconcile::DescriptorAggregator;
use anyhow::{Context, Result};
use std::fs;
use tracing::{debug, info, warn};

/// Reconciles every descriptor in the source project, writes the synthetic
/// descriptor and packages the benchmark jar
pub struct BenchmarkBuildPhase;

impl BenchmarkBuildPhase {
    fn remove_forced_files(context: &PipelineContext) -> Result<()> {
        let java = context.project.java_sources();
        for relative in &context.config.files_to_remove {
            let path = java.join(relative);
            if path.is_file() {
                info!(path = %path.display(), "Forcing removal");
                fs::remove_file(&path).context(format!("Failed to remove {:?}", path))?;
            } else {
                warn!(path = %path.display(), "File to remove does not exist");
            }
        }
        Ok(())
    }
}

impl WorkflowPhase for BenchmarkBuildPhase {
    fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        Self::remove_forced_files(context)?;

        let descriptors = DescriptorScanner::new(&context.config.target_dir).collect_all()?;
        info!(count = descriptors.len(), "Descriptors scanned");

        let options = context.config.aggregator_options()?;
        let reconciled = DescriptorAggregator::new(&descriptors, &context.resolver)
            .reconcile(&options)
            .context("Could not reconcile the project descriptors")?;

        info!(
            group_id = %reconciled.group_id,
            version = %reconciled.version,
            java = %reconciled.java_version,
            dependencies = reconciled.dependencies.len(),
            properties = reconciled.properties.len(),
            repositories = reconciled.repositories.len(),
            "Using JMH version {}",
            reconciled.jmh_version
        );

        if let Ok(json) = serde_json::to_string(&reconciled) {
            debug!(descriptor = %json, "Reconciled descriptor");
        }

        context.project.write(&reconciled)?;
        context.reconciled = Some(reconciled);

        info!("Building benchmarks");
        context.maven.package(context.project.dir())?;
        Ok(())
    }
}
