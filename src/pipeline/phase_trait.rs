use super::context::PipelineContext;
use anyhow::Result;

pub trait WorkflowPhase {
    fn execute(&self, context: &mut PipelineContext) -> Result<()>;
}
