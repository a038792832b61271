use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::WorkflowPhase;
use anyhow::{Context, Result};
use std::fs;
use tracing::{debug, info};

/// Removes the synthetic project left by a previous run
pub struct ResetPhase;

impl WorkflowPhase for ResetPhase {
    fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let dir = context.project.dir();
        if !dir.exists() {
            debug!(path = %dir.display(), "No previous synthetic project");
            return Ok(());
        }

        info!(path = %dir.display(), "Removing previously created synthetic project");
        fs::remove_dir_all(dir).context(format!("Failed to remove {:?}", dir))?;
        Ok(())
    }
}
