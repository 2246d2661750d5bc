//! Subnet setup orchestration.
//!
//! ## Architecture
//!
//! Setup is table-driven, with the plan chosen by the registration mode:
//!
//! ```text
//! ExecutionContext::build     (issuer, credentials, funded address)
//!
//! Sequential:
//!   1. CreateSubnet           (submit, wait on every node)
//!   2. VerifySubnetList       (issuer lists the subnet)
//!   3. AddValidators          (per node: submit, wait on every node)
//!   4. CreateChain            (read genesis, submit, wait on issuer)
//!   5. Finalize               (all validating, then all bootstrapped)
//!
//! Batched:
//!   same, with step 3 submitting every registration before confirming
//! ```
//!
//! Every stage wraps its error with a message naming the stage. The first
//! failure aborts the run; nothing is resumed, so a failed run is restarted
//! from scratch.

mod config;
mod context;
mod genesis;
mod tasks;
mod types;

pub use config::{CustomVm, RegistrationMode, SetupOptions, constants};
pub use context::ExecutionContext;
pub use genesis::{FsGenesisLoader, GenesisLoader};
pub use types::{SetupPipelineContext, SetupReport};

use crate::cancel::Cancellation;
use crate::network::Network;
use crate::pipeline::{BoxedTask, ExecutionPlan, PipelineBuilder, PipelineExecutor};
use std::sync::Arc;
use subnetlite_shared::{SubnetliteError, SubnetliteResult};
use tokio::sync::Mutex;

use tasks::{
    AddValidatorsBatchedTask, AddValidatorsTask, CreateChainTask, CreateSubnetTask, FinalizeTask,
    SetupCtx, VerifySubnetListTask,
};

// ============================================================================
// EXECUTION PLAN
// ============================================================================

fn get_execution_plan(mode: RegistrationMode) -> ExecutionPlan<SetupCtx> {
    let registration: BoxedTask<SetupCtx> = match mode {
        RegistrationMode::Sequential => Box::new(AddValidatorsTask),
        RegistrationMode::Batched => Box::new(AddValidatorsBatchedTask),
    };

    ExecutionPlan::new(vec![
        Box::new(CreateSubnetTask),
        Box::new(VerifySubnetListTask),
        registration,
        Box::new(CreateChainTask),
        Box::new(FinalizeTask),
    ])
}

/// Create a subnet for `vm`, register every node of `network` as its
/// validator, create the VM's chain and wait until every node validates
/// and has bootstrapped it.
///
/// `private_key` funds all transactions. Cancelling `cx` aborts the run.
pub async fn setup_subnet(
    cx: &Cancellation,
    vm: &CustomVm,
    network: &dyn Network,
    private_key: &str,
) -> SubnetliteResult<()> {
    SubnetSetup::new(vm.clone())
        .run(cx, network, private_key)
        .await
        .map(|_| ())
}

/// Configurable setup run.
///
/// # Example
///
/// ```ignore
/// let report = SubnetSetup::new(vm)
///     .with_options(SetupOptions { registration: RegistrationMode::Batched, ..Default::default() })
///     .run(&cx, &network, private_key)
///     .await?;
/// for line in &report.endpoints {
///     println!("{}", line);
/// }
/// ```
pub struct SubnetSetup {
    vm: CustomVm,
    options: SetupOptions,
    genesis: Arc<dyn GenesisLoader>,
}

impl SubnetSetup {
    pub fn new(vm: CustomVm) -> Self {
        Self {
            vm,
            options: SetupOptions::default(),
            genesis: Arc::new(FsGenesisLoader),
        }
    }

    pub fn with_options(mut self, options: SetupOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_genesis_loader(mut self, loader: Arc<dyn GenesisLoader>) -> Self {
        self.genesis = loader;
        self
    }

    pub async fn run(
        self,
        cx: &Cancellation,
        network: &dyn Network,
        private_key: &str,
    ) -> SubnetliteResult<SetupReport> {
        let SubnetSetup {
            vm,
            options,
            genesis,
        } = self;

        options.sanitize()?;
        cx.check()?;

        tracing::info!(chain = %vm.name, subnet_id = %vm.subnet_id, "creating subnet");

        let exec = ExecutionContext::build(cx, network, private_key, &vm.subnet_id)
            .await
            .map_err(|e| e.context("failed initializing subnet"))?;
        let subnet_id = exec.subnet_id;

        let mode = options.registration;
        let ctx = SetupPipelineContext::new(cx.clone(), exec, vm, options, genesis);
        let ctx = Arc::new(Mutex::new(ctx));

        let plan = get_execution_plan(mode);
        let pipeline = PipelineBuilder::from_plan(plan);
        let metrics = PipelineExecutor::execute(pipeline, Arc::clone(&ctx)).await?;
        metrics.log_summary();

        let mut ctx = ctx.lock().await;
        let subnet_tx = ctx
            .subnet_tx
            .ok_or_else(|| SubnetliteError::Internal("create_subnet task must run first".into()))?;
        let blockchain_id = ctx
            .blockchain_id
            .ok_or_else(|| SubnetliteError::Internal("create_chain task must run first".into()))?;

        Ok(SetupReport {
            subnet_id,
            subnet_tx,
            blockchain_id,
            validator_txs: std::mem::take(&mut ctx.validator_txs),
            endpoints: std::mem::take(&mut ctx.endpoints),
            stage_durations_ms: metrics
                .tasks
                .iter()
                .map(|task| (task.name.clone(), task.duration_ms))
                .collect(),
            total_duration_ms: metrics.total_duration_ms,
        })
    }
}
