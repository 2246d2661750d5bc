//! Setup pipeline tasks.
//!
//! Each task is one workflow stage. Tasks submit their transaction exactly
//! once and leave all waiting to [`crate::confirm`].

mod add_validators;
mod create_chain;
mod create_subnet;
mod finalize;
mod subnet_list;

pub use add_validators::{AddValidatorsBatchedTask, AddValidatorsTask};
pub use create_chain::CreateChainTask;
pub use create_subnet::CreateSubnetTask;
pub use finalize::FinalizeTask;
pub use subnet_list::VerifySubnetListTask;

use super::types::SetupPipelineContext;
use crate::cancel::Cancellation;
use std::sync::Arc;
use subnetlite_shared::{SubnetliteError, SubnetliteResult};
use tokio::sync::Mutex;

pub type SetupCtx = Arc<Mutex<SetupPipelineContext>>;

/// Log task start and return the run's carrier.
///
/// Fails if the run was already cancelled, so a task never submits after
/// cancellation.
async fn task_start(ctx: &SetupCtx, task_name: &str) -> SubnetliteResult<Cancellation> {
    let ctx = ctx.lock().await;
    tracing::debug!(
        task = task_name,
        subnet_id = %ctx.exec.subnet_id,
        "Task starting"
    );
    ctx.cx.check()?;
    Ok(ctx.cx.clone())
}

fn log_task_error(task_name: &str, error: &SubnetliteError) {
    tracing::error!(task = task_name, error = %error, "Task failed");
}
