//! Task: Subnet list check.
//!
//! A committed subnet tx does not guarantee the subnet already shows up in
//! list queries. This task reads the issuer's list and fails if it doesn't.

use super::{SetupCtx, log_task_error, task_start};
use crate::pipeline::PipelineTask;
use async_trait::async_trait;
use std::sync::Arc;
use subnetlite_shared::{SubnetliteError, SubnetliteResult};

pub struct VerifySubnetListTask;

#[async_trait]
impl PipelineTask<SetupCtx> for VerifySubnetListTask {
    async fn run(self: Box<Self>, ctx: SetupCtx) -> SubnetliteResult<()> {
        let task_name = self.name();

        verify_subnet_list(&ctx, task_name)
            .await
            .map_err(|e| e.context("failed to confirm subnet is in the node's subnet list"))
            .inspect_err(|e| log_task_error(task_name, e))
    }

    fn name(&self) -> &str {
        "verify_subnet_list"
    }
}

async fn verify_subnet_list(ctx: &SetupCtx, task_name: &str) -> SubnetliteResult<()> {
    let cx = task_start(ctx, task_name).await?;
    let exec = Arc::clone(&ctx.lock().await.exec);
    let subnet_id = exec.subnet_id;

    let subnets = cx
        .run(exec.platform.get_subnets(&[subnet_id]))
        .await?
        .map_err(|e| e.context("subnet not found"))?;

    if !subnets.iter().any(|subnet| subnet.id == subnet_id) {
        return Err(SubnetliteError::Inconsistent(format!(
            "subnet {} was committed but is missing from the subnet list of {}",
            subnet_id, exec.issuer_name
        )));
    }

    tracing::debug!(subnet_id = %subnet_id, "Subnet found in subnet list");
    Ok(())
}
