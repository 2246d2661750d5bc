//! Node-local predicates polled by the confirmation engine.

use crate::api::{BlockchainStatus, TxStatus};
use crate::network::Node;
use async_trait::async_trait;
use subnetlite_shared::{Id, SubnetliteResult};

/// A yes/no question asked of one node.
///
/// `Ok(false)` means "not yet". Probes never submit anything; asking the
/// same question again has no effect on the ledger.
#[async_trait]
pub trait StatusProbe: Send + Sync {
    async fn probe(&self, node: &dyn Node) -> SubnetliteResult<bool>;

    /// Short description for log lines, e.g. `subnet creation tx 1f2e...`.
    fn describe(&self) -> String;
}

/// Is the transaction committed on this node?
pub struct TxCommitted {
    pub tx_id: Id,
    pub label: &'static str,
}

impl TxCommitted {
    pub fn new(label: &'static str, tx_id: Id) -> Self {
        Self { tx_id, label }
    }
}

#[async_trait]
impl StatusProbe for TxCommitted {
    async fn probe(&self, node: &dyn Node) -> SubnetliteResult<bool> {
        let status = node
            .api_client()
            .platform()
            .get_tx_status(&self.tx_id)
            .await?;
        Ok(status == TxStatus::Committed)
    }

    fn describe(&self) -> String {
        format!("{} tx {}", self.label, self.tx_id)
    }
}

/// Is this node validating the chain?
pub struct ChainValidating {
    pub chain_id: Id,
}

#[async_trait]
impl StatusProbe for ChainValidating {
    async fn probe(&self, node: &dyn Node) -> SubnetliteResult<bool> {
        let status = node
            .api_client()
            .platform()
            .get_blockchain_status(&self.chain_id)
            .await
            .map_err(|e| e.context("error querying blockchain status"))?;
        Ok(status == BlockchainStatus::Validating)
    }

    fn describe(&self) -> String {
        format!("validating status for blockchain {}", self.chain_id)
    }
}

/// Has this node bootstrapped the chain?
pub struct ChainBootstrapped {
    pub chain_id: Id,
}

#[async_trait]
impl StatusProbe for ChainBootstrapped {
    async fn probe(&self, node: &dyn Node) -> SubnetliteResult<bool> {
        node.api_client().info().is_bootstrapped(&self.chain_id).await
    }

    fn describe(&self) -> String {
        format!("bootstrap of blockchain {}", self.chain_id)
    }
}
