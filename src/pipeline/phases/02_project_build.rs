use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::WorkflowPhase;
use anyhow::{Context, Result};
use std::fs;
use tracing::info;

/// Full build of the source project, so its modules land in the local repository
pub struct ProjectBuildPhase;

impl WorkflowPhase for ProjectBuildPhase {
    fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        info!("Running maven build...");
        context.maven.install(&context.config.target_dir)?;

        let java = context.project.java_sources();
        fs::create_dir_all(&java).context(format!("Failed to create {:?}", java))?;
        Ok(())
    }
}
