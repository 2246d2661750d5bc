//! Task: Blockchain creation.
//!
//! Reads the genesis payload, issues create-blockchain on the issuer and
//! waits for the issuer alone to commit it. Fleet-wide checks happen during
//! finalization. This stage runs under the caller's carrier only.

use super::{SetupCtx, log_task_error, task_start};
use crate::api::CreateBlockchainRequest;
use crate::confirm::{Pacing, QueryErrors, TxCommitted, wait_for_node};
use crate::pipeline::PipelineTask;
use async_trait::async_trait;
use std::sync::Arc;
use subnetlite_shared::{Id, SubnetliteResult};

pub struct CreateChainTask;

#[async_trait]
impl PipelineTask<SetupCtx> for CreateChainTask {
    async fn run(self: Box<Self>, ctx: SetupCtx) -> SubnetliteResult<()> {
        let task_name = self.name();

        let blockchain_id = create_blockchain(&ctx, task_name)
            .await
            .map_err(|e| e.context("failed creating blockchain"))
            .inspect_err(|e| log_task_error(task_name, e))?;

        ctx.lock().await.blockchain_id = Some(blockchain_id);
        Ok(())
    }

    fn name(&self) -> &str {
        "create_chain"
    }
}

async fn create_blockchain(ctx: &SetupCtx, task_name: &str) -> SubnetliteResult<Id> {
    let cx = task_start(ctx, task_name).await?;
    let (exec, vm, interval, loader) = {
        let ctx = ctx.lock().await;
        (
            Arc::clone(&ctx.exec),
            ctx.vm.clone(),
            ctx.options.api_retry_interval(),
            Arc::clone(&ctx.genesis),
        )
    };

    let genesis = cx.run(loader.read(&vm.genesis)).await??;

    let request = CreateBlockchainRequest {
        user: exec.user_pass.clone(),
        from: vec![exec.funded_address.clone()],
        change_address: exec.funded_address.clone(),
        subnet_id: exec.subnet_id,
        vm_id: vm.id.clone(),
        fx_ids: Vec::new(),
        name: vm.name.clone(),
        genesis,
    };
    let tx_id = cx
        .run(exec.platform.create_blockchain(&request))
        .await?
        .map_err(|e| e.context("could not create blockchain"))?;

    wait_for_node(
        &cx,
        exec.issuer.as_ref(),
        &TxCommitted::new("create blockchain", tx_id),
        &Pacing::fixed(interval),
        QueryErrors::Fail,
    )
    .await?;

    tracing::info!(tx_id = %tx_id, chain = %vm.name, "create blockchain tx accepted");
    Ok(tx_id)
}
