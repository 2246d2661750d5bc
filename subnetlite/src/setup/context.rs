//! Execution context shared by every stage of a setup run.

use crate::api::{PlatformApi, UserPass};
use crate::cancel::Cancellation;
use crate::network::{Fleet, Network, Node};
use std::sync::Arc;
use subnetlite_shared::{Id, SubnetliteError, SubnetliteResult};

/// Read-only state derived once at the start of a run.
pub struct ExecutionContext {
    /// Name of the node every transaction is issued through.
    pub issuer_name: String,
    pub issuer: Arc<dyn Node>,
    pub platform: Arc<dyn PlatformApi>,
    pub user_pass: UserPass,
    /// Address holding the imported funding key.
    pub funded_address: String,
    pub subnet_id: Id,
    /// Snapshot of the fleet taken when the run started.
    pub fleet: Fleet,
}

impl ExecutionContext {
    /// Pick the issuer, provision credentials on it and import the funding key.
    ///
    /// All precondition checks run before the first API call, so a
    /// malformed input never touches a node.
    pub async fn build(
        cx: &Cancellation,
        network: &dyn Network,
        private_key: &str,
        subnet_id: &str,
    ) -> SubnetliteResult<Self> {
        let fleet = network.get_all_nodes()?;
        let names = network.get_node_names()?;

        if fleet.is_empty() {
            return Err(SubnetliteError::Config("the network has no nodes".into()));
        }
        let issuer_name = names
            .first()
            .cloned()
            .ok_or_else(|| SubnetliteError::Config("the list of node names is empty".into()))?;
        let subnet_id: Id = subnet_id
            .parse()
            .map_err(|e: SubnetliteError| e.context("invalid subnet id"))?;
        let issuer = fleet.get(&issuer_name).cloned().ok_or_else(|| {
            SubnetliteError::NotFound(format!("issuing node {} is not in the network", issuer_name))
        })?;

        let client = issuer.api_client();
        let user_pass = UserPass::ephemeral();

        let created = cx
            .run(client.keystore().create_user(&user_pass))
            .await?
            .map_err(|e| e.context("could not create user"))?;
        if !created {
            return Err(SubnetliteError::Api(format!(
                "could not create user {} on {}",
                user_pass.username, issuer_name
            )));
        }

        let platform = client.platform();
        let funded_address = cx
            .run(platform.import_key(&user_pass, private_key))
            .await?
            .map_err(|e| e.context("unable to import genesis key"))?;

        tracing::debug!(
            issuer = %issuer_name,
            user = %user_pass.username,
            address = %funded_address,
            "Execution context ready"
        );

        Ok(Self {
            issuer_name,
            issuer,
            platform,
            user_pass,
            funded_address,
            subnet_id,
            fleet,
        })
    }
}
