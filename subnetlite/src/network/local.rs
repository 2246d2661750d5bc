//! In-memory fleet handle assembled from caller-supplied nodes.

use super::{Fleet, Network, Node};
use crate::api::ApiClient;
use parking_lot::RwLock;
use std::sync::Arc;
use subnetlite_shared::{NodeId, SubnetliteError, SubnetliteResult};

/// Node described by fixed values.
pub struct StaticNode {
    name: String,
    node_id: NodeId,
    url: String,
    api_port: u16,
    client: Arc<dyn ApiClient>,
}

impl StaticNode {
    pub fn new(
        name: impl Into<String>,
        node_id: NodeId,
        url: impl Into<String>,
        api_port: u16,
        client: Arc<dyn ApiClient>,
    ) -> Self {
        Self {
            name: name.into(),
            node_id,
            url: url.into(),
            api_port,
            client,
        }
    }
}

impl Node for StaticNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn api_port(&self) -> u16 {
        self.api_port
    }

    fn api_client(&self) -> Arc<dyn ApiClient> {
        Arc::clone(&self.client)
    }
}

/// Fleet handle over nodes that are already running.
///
/// Node names keep insertion order; the first name is the one the
/// orchestrator issues transactions on.
pub struct LocalNetwork {
    inner: RwLock<LocalNetworkInner>,
}

struct LocalNetworkInner {
    names: Vec<String>,
    nodes: Fleet,
    stopped: bool,
}

impl LocalNetwork {
    pub fn new(nodes: impl IntoIterator<Item = Arc<dyn Node>>) -> SubnetliteResult<Self> {
        let network = Self {
            inner: RwLock::new(LocalNetworkInner {
                names: Vec::new(),
                nodes: Fleet::new(),
                stopped: false,
            }),
        };
        for node in nodes {
            network.add_node(node)?;
        }
        Ok(network)
    }

    /// Add a node. Names must be unique.
    pub fn add_node(&self, node: Arc<dyn Node>) -> SubnetliteResult<()> {
        let mut inner = self.inner.write();
        if inner.stopped {
            return Err(SubnetliteError::NetworkStopped);
        }

        let name = node.name().to_string();
        if inner.nodes.contains_key(&name) {
            return Err(SubnetliteError::InvalidArgument(format!(
                "node with name '{}' already exists",
                name
            )));
        }

        tracing::debug!(node = %name, node_id = %node.node_id(), "Adding node to network");
        inner.names.push(name.clone());
        inner.nodes.insert(name, node);
        Ok(())
    }

    /// Forget a node. The node process itself is not touched.
    pub fn remove_node(&self, name: &str) -> SubnetliteResult<()> {
        let mut inner = self.inner.write();
        if inner.stopped {
            return Err(SubnetliteError::NetworkStopped);
        }

        if inner.nodes.remove(name).is_none() {
            return Err(SubnetliteError::NotFound(format!("node '{}'", name)));
        }
        inner.names.retain(|n| n != name);
        Ok(())
    }

    /// Tear down the handle. Returns `NetworkStopped` if already stopped.
    pub fn stop(&self) -> SubnetliteResult<()> {
        let mut inner = self.inner.write();
        if inner.stopped {
            return Err(SubnetliteError::NetworkStopped);
        }
        inner.stopped = true;
        inner.names.clear();
        inner.nodes.clear();
        tracing::info!("Network stopped");
        Ok(())
    }
}

impl Network for LocalNetwork {
    fn get_node(&self, name: &str) -> SubnetliteResult<Arc<dyn Node>> {
        let inner = self.inner.read();
        if inner.stopped {
            return Err(SubnetliteError::NetworkStopped);
        }
        inner
            .nodes
            .get(name)
            .cloned()
            .ok_or_else(|| SubnetliteError::NotFound(format!("node '{}'", name)))
    }

    fn get_all_nodes(&self) -> SubnetliteResult<Fleet> {
        let inner = self.inner.read();
        if inner.stopped {
            return Err(SubnetliteError::NetworkStopped);
        }
        Ok(inner.nodes.clone())
    }

    fn get_node_names(&self) -> SubnetliteResult<Vec<String>> {
        let inner = self.inner.read();
        if inner.stopped {
            return Err(SubnetliteError::NetworkStopped);
        }
        Ok(inner.names.clone())
    }
}
