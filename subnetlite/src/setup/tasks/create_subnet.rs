//! Task: Subnet creation.
//!
//! Issues the create-subnet tx on the issuer and waits for every node to
//! commit it.

use super::{SetupCtx, log_task_error, task_start};
use crate::api::CreateSubnetRequest;
use crate::cancel::Cancellation;
use crate::confirm::wait_for_tx_on_fleet;
use crate::pipeline::PipelineTask;
use crate::setup::config::SetupOptions;
use crate::setup::context::ExecutionContext;
use async_trait::async_trait;
use std::sync::Arc;
use subnetlite_shared::{Id, SubnetliteResult};

pub struct CreateSubnetTask;

#[async_trait]
impl PipelineTask<SetupCtx> for CreateSubnetTask {
    async fn run(self: Box<Self>, ctx: SetupCtx) -> SubnetliteResult<()> {
        let task_name = self.name();

        let tx_id = create_subnet(&ctx, task_name)
            .await
            .map_err(|e| e.context("failed creating subnet"))
            .inspect_err(|e| log_task_error(task_name, e))?;

        ctx.lock().await.subnet_tx = Some(tx_id);
        Ok(())
    }

    fn name(&self) -> &str {
        "create_subnet"
    }
}

async fn create_subnet(ctx: &SetupCtx, task_name: &str) -> SubnetliteResult<Id> {
    let cx = task_start(ctx, task_name).await?;
    let (exec, options) = {
        let ctx = ctx.lock().await;
        (Arc::clone(&ctx.exec), ctx.options.clone())
    };
    let cx = match options.subnet_timeout() {
        Some(timeout) => cx.with_timeout(timeout),
        None => cx,
    };

    let tx_id = issue_create_subnet(&cx, &exec, &options).await?;
    wait_for_tx_on_fleet(
        &cx,
        &exec.fleet,
        "subnet creation",
        tx_id,
        options.api_retry_interval(),
    )
    .await?;

    tracing::info!(tx_id = %tx_id, "all nodes accepted subnet tx creation");
    Ok(tx_id)
}

async fn issue_create_subnet(
    cx: &Cancellation,
    exec: &ExecutionContext,
    options: &SetupOptions,
) -> SubnetliteResult<Id> {
    let request = CreateSubnetRequest {
        user: exec.user_pass.clone(),
        from: vec![exec.funded_address.clone()],
        change_address: exec.funded_address.clone(),
        control_keys: vec![exec.funded_address.clone()],
        threshold: options.key_threshold,
    };

    let tx_id = cx
        .run(exec.platform.create_subnet(&request))
        .await?
        .map_err(|e| e.context("unable to create subnet"))?;

    tracing::debug!(tx_id = %tx_id, issuer = %exec.issuer_name, "Subnet creation tx issued");
    Ok(tx_id)
}
