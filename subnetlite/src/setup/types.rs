//! Type definitions for the setup pipeline.

use super::config::{CustomVm, SetupOptions};
use super::context::ExecutionContext;
use super::genesis::GenesisLoader;
use crate::cancel::Cancellation;
use std::sync::Arc;
use subnetlite_shared::Id;

/// State threaded through the setup tasks.
///
/// Inputs are set once when the pipeline is built. Each task fills in its
/// own output slot; a later task reads the slots of the tasks before it.
pub struct SetupPipelineContext {
    pub cx: Cancellation,
    pub exec: Arc<ExecutionContext>,
    pub vm: CustomVm,
    pub options: SetupOptions,
    pub genesis: Arc<dyn GenesisLoader>,

    pub subnet_tx: Option<Id>,
    pub validator_txs: Vec<Id>,
    pub blockchain_id: Option<Id>,
    pub endpoints: Vec<String>,
}

impl SetupPipelineContext {
    pub fn new(
        cx: Cancellation,
        exec: ExecutionContext,
        vm: CustomVm,
        options: SetupOptions,
        genesis: Arc<dyn GenesisLoader>,
    ) -> Self {
        Self {
            cx,
            exec: Arc::new(exec),
            vm,
            options,
            genesis,
            subnet_tx: None,
            validator_txs: Vec::new(),
            blockchain_id: None,
            endpoints: Vec::new(),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct SetupReport {
    pub subnet_id: Id,
    pub subnet_tx: Id,
    pub blockchain_id: Id,
    /// One registration tx per node, in registration order.
    pub validator_txs: Vec<Id>,
    /// One line per node: `{node_id}: {url}:{api_port}/ext/bc/{chain_id}`.
    pub endpoints: Vec<String>,
    /// Stage name -> duration in milliseconds.
    pub stage_durations_ms: Vec<(String, u128)>,
    pub total_duration_ms: u128,
}
