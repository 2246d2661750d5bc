//! Task: Validator registration.
//!
//! Registers every node of the fleet as a validator of the subnet. The stage
//! is complete only once every registration is committed on every node.
//!
//! - [`AddValidatorsTask`]: submit one registration, confirm it fleet-wide,
//!   then move on to the next node.
//! - [`AddValidatorsBatchedTask`]: submit all registrations, then confirm
//!   each of them fleet-wide.

use super::{SetupCtx, log_task_error, task_start};
use crate::api::AddSubnetValidatorRequest;
use crate::cancel::Cancellation;
use crate::confirm::wait_for_tx_on_fleet;
use crate::network::Node;
use crate::pipeline::PipelineTask;
use crate::setup::config::{RegistrationMode, SetupOptions};
use crate::setup::context::ExecutionContext;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use subnetlite_shared::{Id, SubnetliteResult};

const TX_LABEL: &str = "add subnet validator";

pub struct AddValidatorsTask;

#[async_trait]
impl PipelineTask<SetupCtx> for AddValidatorsTask {
    async fn run(self: Box<Self>, ctx: SetupCtx) -> SubnetliteResult<()> {
        run_registration(ctx, self.name(), RegistrationMode::Sequential).await
    }

    fn name(&self) -> &str {
        "add_validators"
    }
}

pub struct AddValidatorsBatchedTask;

#[async_trait]
impl PipelineTask<SetupCtx> for AddValidatorsBatchedTask {
    async fn run(self: Box<Self>, ctx: SetupCtx) -> SubnetliteResult<()> {
        run_registration(ctx, self.name(), RegistrationMode::Batched).await
    }

    fn name(&self) -> &str {
        "add_validators_batched"
    }
}

async fn run_registration(
    ctx: SetupCtx,
    task_name: &str,
    mode: RegistrationMode,
) -> SubnetliteResult<()> {
    let tx_ids = add_all_as_validators(&ctx, task_name, mode)
        .await
        .map_err(|e| e.context("failed to add nodes as validators"))
        .inspect_err(|e| log_task_error(task_name, e))?;

    ctx.lock().await.validator_txs = tx_ids;
    Ok(())
}

async fn add_all_as_validators(
    ctx: &SetupCtx,
    task_name: &str,
    mode: RegistrationMode,
) -> SubnetliteResult<Vec<Id>> {
    let cx = task_start(ctx, task_name).await?;
    let (exec, options) = {
        let ctx = ctx.lock().await;
        (Arc::clone(&ctx.exec), ctx.options.clone())
    };
    let cx = match options.validators_timeout() {
        Some(timeout) => cx.with_timeout(timeout),
        None => cx,
    };
    let interval = options.api_retry_interval();

    let mut tx_ids = Vec::with_capacity(exec.fleet.len());
    match mode {
        RegistrationMode::Sequential => {
            for node in exec.fleet.values() {
                let tx_id = issue_registration(&cx, &exec, &options, node.as_ref()).await?;
                wait_for_tx_on_fleet(&cx, &exec.fleet, TX_LABEL, tx_id, interval).await?;
                tx_ids.push(tx_id);
            }
        }
        RegistrationMode::Batched => {
            for node in exec.fleet.values() {
                tx_ids.push(issue_registration(&cx, &exec, &options, node.as_ref()).await?);
            }
            for tx_id in &tx_ids {
                wait_for_tx_on_fleet(&cx, &exec.fleet, TX_LABEL, *tx_id, interval).await?;
            }
        }
    }

    tracing::info!(
        subnet_id = %exec.subnet_id,
        validators = tx_ids.len(),
        "all nodes added as subnet validators"
    );
    Ok(tx_ids)
}

async fn issue_registration(
    cx: &Cancellation,
    exec: &ExecutionContext,
    options: &SetupOptions,
    node: &dyn Node,
) -> SubnetliteResult<Id> {
    let (start_time, end_time) = validity_window(options);
    let request = AddSubnetValidatorRequest {
        user: exec.user_pass.clone(),
        from: vec![exec.funded_address.clone()],
        change_address: exec.funded_address.clone(),
        subnet_id: exec.subnet_id,
        node_id: node.node_id(),
        weight: options.validator_weight,
        start_time,
        end_time,
    };

    let tx_id = cx
        .run(exec.platform.add_subnet_validator(&request))
        .await?
        .map_err(|e| e.context("unable to add subnet validator"))?;

    tracing::debug!(
        node = %node.name(),
        node_id = %request.node_id,
        tx_id = %tx_id,
        "Validator registration tx issued"
    );
    Ok(tx_id)
}

/// `[now + start offset, now + end offset]` in unix seconds.
fn validity_window(options: &SetupOptions) -> (u64, u64) {
    let now = Utc::now().timestamp().max(0) as u64;
    (
        now.saturating_add(options.validator_start_offset_secs),
        now.saturating_add(options.validator_end_offset_secs),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_window_uses_offsets() {
        let options = SetupOptions::default();
        let before = Utc::now().timestamp() as u64;
        let (start, end) = validity_window(&options);

        assert!(start >= before + options.validator_start_offset_secs);
        assert_eq!(
            end - start,
            options.validator_end_offset_secs - options.validator_start_offset_secs
        );
    }
}
