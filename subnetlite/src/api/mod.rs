//! Ledger API capabilities consumed by the orchestrator.
//!
//! A node's API is split the same way the node serves it:
//!
//! - **KeystoreApi**: user management on the node's keystore
//! - **PlatformApi**: platform-chain transactions and queries
//! - **InfoApi**: node-level status
//!
//! Implementations live outside this crate (an RPC client, a test double).
//! Every method is a single request; retries and polling are the caller's job.

mod types;

pub use types::{
    AddSubnetValidatorRequest, BlockchainStatus, CreateBlockchainRequest, CreateSubnetRequest,
    SubnetInfo, TxStatus, UserPass,
};

use async_trait::async_trait;
use std::sync::Arc;
use subnetlite_shared::{Id, SubnetliteResult};

/// Access to every API a node exposes.
pub trait ApiClient: Send + Sync {
    fn keystore(&self) -> Arc<dyn KeystoreApi>;

    fn platform(&self) -> Arc<dyn PlatformApi>;

    fn info(&self) -> Arc<dyn InfoApi>;
}

#[async_trait]
pub trait KeystoreApi: Send + Sync {
    /// Create a keystore user. Returns the node's success flag.
    async fn create_user(&self, user: &UserPass) -> SubnetliteResult<bool>;
}

#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Import a private key into the user's wallet and return its address.
    async fn import_key(&self, user: &UserPass, private_key: &str) -> SubnetliteResult<String>;

    /// Issue a create-subnet transaction and return its id.
    async fn create_subnet(&self, request: &CreateSubnetRequest) -> SubnetliteResult<Id>;

    /// Issue an add-subnet-validator transaction and return its id.
    async fn add_subnet_validator(
        &self,
        request: &AddSubnetValidatorRequest,
    ) -> SubnetliteResult<Id>;

    /// Issue a create-blockchain transaction and return its id, which is
    /// also the id of the new chain.
    async fn create_blockchain(&self, request: &CreateBlockchainRequest) -> SubnetliteResult<Id>;

    async fn get_tx_status(&self, tx_id: &Id) -> SubnetliteResult<TxStatus>;

    /// This node's role for the given chain.
    async fn get_blockchain_status(&self, chain_id: &Id) -> SubnetliteResult<BlockchainStatus>;

    /// Subnets known to this node, restricted to `ids`.
    async fn get_subnets(&self, ids: &[Id]) -> SubnetliteResult<Vec<SubnetInfo>>;
}

#[async_trait]
pub trait InfoApi: Send + Sync {
    async fn is_bootstrapped(&self, chain_id: &Id) -> SubnetliteResult<bool>;
}
