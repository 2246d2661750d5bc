//! Fleet handle and node capabilities.
//!
//! The orchestrator never creates or destroys nodes. It reads them through
//! [`Network`] and talks to each one through [`Node::api_client`].

mod local;

pub use local::{LocalNetwork, StaticNode};

use crate::api::ApiClient;
use std::collections::BTreeMap;
use std::sync::Arc;
use subnetlite_shared::{NodeId, SubnetliteResult};

/// Snapshot of a fleet: node name -> node.
pub type Fleet = BTreeMap<String, Arc<dyn Node>>;

/// A running validator node.
///
/// Identity, address and API are fixed for the lifetime of a workflow run.
pub trait Node: Send + Sync {
    fn name(&self) -> &str;

    fn node_id(&self) -> NodeId;

    /// Host part of the node's API address.
    fn url(&self) -> &str;

    fn api_port(&self) -> u16;

    fn api_client(&self) -> Arc<dyn ApiClient>;
}

/// Access to a fleet of running nodes.
///
/// Every method fails with `SubnetliteError::NetworkStopped` once the
/// network has been torn down.
pub trait Network: Send + Sync {
    fn get_node(&self, name: &str) -> SubnetliteResult<Arc<dyn Node>>;

    fn get_all_nodes(&self) -> SubnetliteResult<Fleet>;

    fn get_node_names(&self) -> SubnetliteResult<Vec<String>>;
}
