//! A single stage of a sequential pipeline.

use async_trait::async_trait;
use subnetlite_shared::SubnetliteResult;

/// One workflow stage.
///
/// A stage gets its own handle to the shared context, reads the outputs of
/// earlier stages from it and stores its own. Returning `Err` aborts the
/// pipeline, so a stage must not leave work running in the background.
#[async_trait]
pub trait PipelineTask<Ctx>: Send + Sync {
    async fn run(self: Box<Self>, ctx: Ctx) -> SubnetliteResult<()>;

    /// Stable stage name, used in logs and metrics.
    fn name(&self) -> &str;
}

pub type BoxedTask<Ctx> = Box<dyn PipelineTask<Ctx>>;
