//! Request and response types for the ledger API.

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;
use subnetlite_shared::{Id, NodeId};

const PASSWORD_LEN: usize = 32;

/// Status of a submitted transaction as seen by one node.
///
/// Only `Committed` is terminal for the orchestrator; every other value
/// means "not yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Unknown,
    Processing,
    Committed,
    Aborted,
    Dropped,
}

/// A node's role for a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockchainStatus {
    Unknown,
    Created,
    Preferred,
    Syncing,
    Validating,
}

/// Keystore credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserPass {
    pub username: String,
    pub password: String,
}

impl UserPass {
    /// Fresh credentials for a single workflow run.
    pub fn ephemeral() -> Self {
        let password = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(PASSWORD_LEN)
            .map(char::from)
            .collect();

        Self {
            username: format!("subnetlite-{}", uuid::Uuid::new_v4().simple()),
            password,
        }
    }
}

// Keep the password out of logs.
impl fmt::Debug for UserPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPass")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubnetInfo {
    pub id: Id,
    pub control_keys: Vec<String>,
    pub threshold: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubnetRequest {
    pub user: UserPass,
    /// Addresses paying the fee.
    pub from: Vec<String>,
    pub change_address: String,
    /// Addresses allowed to authorize subnet changes.
    pub control_keys: Vec<String>,
    /// Signatures from `control_keys` required per change.
    pub threshold: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSubnetValidatorRequest {
    pub user: UserPass,
    pub from: Vec<String>,
    pub change_address: String,
    pub subnet_id: Id,
    pub node_id: NodeId,
    pub weight: u64,
    /// Unix seconds.
    pub start_time: u64,
    /// Unix seconds.
    pub end_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlockchainRequest {
    pub user: UserPass,
    pub from: Vec<String>,
    pub change_address: String,
    pub subnet_id: Id,
    pub vm_id: String,
    pub fx_ids: Vec<String>,
    pub name: String,
    pub genesis: Vec<u8>,
}
