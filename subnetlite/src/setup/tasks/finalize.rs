//! Task: Finalization.
//!
//! Waits until every node validates the new chain, then until every node has
//! bootstrapped it, and reports the endpoints.

use super::{SetupCtx, log_task_error, task_start};
use crate::cancel::Cancellation;
use crate::confirm::{
    ChainBootstrapped, ChainValidating, Pacing, QueryErrors, wait_for_fleet,
};
use crate::network::Fleet;
use crate::pipeline::PipelineTask;
use crate::setup::config::SetupOptions;
use async_trait::async_trait;
use std::sync::Arc;
use subnetlite_shared::{Id, SubnetliteError, SubnetliteResult};

pub struct FinalizeTask;

#[async_trait]
impl PipelineTask<SetupCtx> for FinalizeTask {
    async fn run(self: Box<Self>, ctx: SetupCtx) -> SubnetliteResult<()> {
        let task_name = self.name();

        let endpoints = finalize_blockchain(&ctx, task_name)
            .await
            .map_err(|e| e.context("error checking all nodes are validating subnet"))
            .inspect_err(|e| log_task_error(task_name, e))?;

        ctx.lock().await.endpoints = endpoints;
        Ok(())
    }

    fn name(&self) -> &str {
        "finalize"
    }
}

async fn finalize_blockchain(ctx: &SetupCtx, task_name: &str) -> SubnetliteResult<Vec<String>> {
    let cx = task_start(ctx, task_name).await?;
    let (exec, options, blockchain_id) = {
        let ctx = ctx.lock().await;
        (Arc::clone(&ctx.exec), ctx.options.clone(), ctx.blockchain_id)
    };
    let blockchain_id = blockchain_id
        .ok_or_else(|| SubnetliteError::Internal("create_chain task must run first".into()))?;
    let cx = match options.finalize_timeout() {
        Some(timeout) => cx.with_timeout(timeout),
        None => cx,
    };

    ensure_validating(&cx, &exec.fleet, &options, blockchain_id)
        .await
        .map_err(|e| e.context("error checking all nodes are validating the blockchain"))?;
    ensure_bootstrapped(&cx, &exec.fleet, &options, blockchain_id)
        .await
        .map_err(|e| e.context("error checking blockchain is bootstrapped"))?;

    let endpoints = endpoint_lines(&exec.fleet, blockchain_id);
    tracing::info!("Custom VM endpoints now accessible at:");
    for line in &endpoints {
        tracing::info!("{}", line);
    }
    Ok(endpoints)
}

/// Every node reports the chain as validating. Query errors are fatal, and
/// polling speeds up once the first node confirms.
async fn ensure_validating(
    cx: &Cancellation,
    fleet: &Fleet,
    options: &SetupOptions,
    chain_id: Id,
) -> SubnetliteResult<()> {
    wait_for_fleet(
        cx,
        fleet,
        &ChainValidating { chain_id },
        &Pacing::adaptive(
            options.validating_initial_interval(),
            options.api_retry_interval(),
        ),
        QueryErrors::Fail,
    )
    .await
}

/// Every node reports the chain as bootstrapped. Query errors count as
/// "not yet".
async fn ensure_bootstrapped(
    cx: &Cancellation,
    fleet: &Fleet,
    options: &SetupOptions,
    chain_id: Id,
) -> SubnetliteResult<()> {
    wait_for_fleet(
        cx,
        fleet,
        &ChainBootstrapped { chain_id },
        &Pacing::fixed(options.api_retry_interval()),
        QueryErrors::Retry,
    )
    .await
}

fn endpoint_lines(fleet: &Fleet, chain_id: Id) -> Vec<String> {
    fleet
        .values()
        .map(|node| {
            format!(
                "{}: {}:{}/ext/bc/{}",
                node.node_id(),
                node.url(),
                node.api_port(),
                chain_id
            )
        })
        .collect()
}
