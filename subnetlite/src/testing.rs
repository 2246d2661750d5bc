//! Scripted in-memory ledger used by unit tests.
//!
//! All nodes of a [`MockFleet`] share one [`MockLedger`] that records every
//! keystore call, submission and observed commitment in order. Each node has
//! its own [`MockApi`] whose query answers can be scripted; once a script
//! runs out the node answers with its default (committed, validating,
//! bootstrapped). [`MockLedger::delay_commit`] holds back commitment of one
//! transaction kind for a number of polls on every node.

use crate::api::{
    AddSubnetValidatorRequest, ApiClient, BlockchainStatus, CreateBlockchainRequest,
    CreateSubnetRequest, InfoApi, KeystoreApi, PlatformApi, SubnetInfo, TxStatus, UserPass,
};
use crate::network::{Fleet, LocalNetwork, Node, StaticNode};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use subnetlite_shared::{Id, NodeId, SubnetliteError, SubnetliteResult};

pub(crate) const FUNDED_ADDRESS: &str = "P-local1fundedaddress";

#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
    Value(T),
    Error(String),
}

impl<T> Reply<T> {
    fn into_result(self) -> SubnetliteResult<T> {
        match self {
            Reply::Value(v) => Ok(v),
            Reply::Error(msg) => Err(SubnetliteError::Api(msg)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LedgerEvent {
    CreateUser { node: String },
    ImportKey { node: String },
    Submitted { kind: &'static str, tx_id: Id },
    Committed { node: String, tx_id: Id },
}

/// Ledger state shared by every node of a mock fleet.
#[derive(Default)]
pub(crate) struct MockLedger {
    events: Mutex<Vec<LedgerEvent>>,
    next_tx: AtomicU64,
    subnets: Mutex<Vec<Id>>,
    pub subnet_requests: Mutex<Vec<CreateSubnetRequest>>,
    pub validator_requests: Mutex<Vec<AddSubnetValidatorRequest>>,
    pub chain_requests: Mutex<Vec<CreateBlockchainRequest>>,
    pub refuse_user: AtomicBool,
    pub reject_key: AtomicBool,
    pub hide_subnet: AtomicBool,
    pub reject_submission: Mutex<Option<&'static str>>,
    kinds: Mutex<HashMap<Id, &'static str>>,
    commit_delay: Mutex<HashMap<&'static str, usize>>,
}

impl MockLedger {
    /// Id of the subnet every `create_subnet` call brings into existence.
    pub(crate) const SUBNET_ID: Id = Id::new([0x5a; 32]);

    pub(crate) fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().clone()
    }

    pub(crate) fn submissions(&self, kind: &str) -> Vec<Id> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                LedgerEvent::Submitted { kind: k, tx_id } if *k == kind => Some(*tx_id),
                _ => None,
            })
            .collect()
    }

    /// Every node answers `Processing` for the first `polls` unscripted
    /// status queries of each `kind` transaction.
    pub(crate) fn delay_commit(&self, kind: &'static str, polls: usize) {
        self.commit_delay.lock().insert(kind, polls);
    }

    fn pending_polls(&self, tx_id: &Id) -> usize {
        let kinds = self.kinds.lock();
        kinds
            .get(tx_id)
            .and_then(|kind| self.commit_delay.lock().get(kind).copied())
            .unwrap_or(0)
    }

    fn record(&self, event: LedgerEvent) {
        self.events.lock().push(event);
    }

    fn submit(&self, kind: &'static str) -> SubnetliteResult<Id> {
        if *self.reject_submission.lock() == Some(kind) {
            return Err(SubnetliteError::Api(format!("{} rejected", kind)));
        }
        let n = self.next_tx.fetch_add(1, Ordering::SeqCst) + 1;
        let mut bytes = [0u8; 32];
        bytes[0] = 0x7e;
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        let tx_id = Id::new(bytes);
        self.kinds.lock().insert(tx_id, kind);
        self.record(LedgerEvent::Submitted { kind, tx_id });
        Ok(tx_id)
    }
}

/// API of one mock node.
pub(crate) struct MockApi {
    node: String,
    ledger: Arc<MockLedger>,
    tx_script: Mutex<VecDeque<Reply<TxStatus>>>,
    default_tx: Mutex<TxStatus>,
    chain_script: Mutex<VecDeque<Reply<BlockchainStatus>>>,
    default_chain: Mutex<BlockchainStatus>,
    bootstrap_script: Mutex<VecDeque<Reply<bool>>>,
    tx_polls: Mutex<HashMap<Id, usize>>,
    tx_queries: AtomicUsize,
    chain_queries: AtomicUsize,
    bootstrap_queries: AtomicUsize,
}

impl MockApi {
    fn new(node: String, ledger: Arc<MockLedger>) -> Self {
        Self {
            node,
            ledger,
            tx_script: Mutex::new(VecDeque::new()),
            default_tx: Mutex::new(TxStatus::Committed),
            chain_script: Mutex::new(VecDeque::new()),
            default_chain: Mutex::new(BlockchainStatus::Validating),
            bootstrap_script: Mutex::new(VecDeque::new()),
            tx_polls: Mutex::new(HashMap::new()),
            tx_queries: AtomicUsize::new(0),
            chain_queries: AtomicUsize::new(0),
            bootstrap_queries: AtomicUsize::new(0),
        }
    }

    pub(crate) fn script_tx(&self, replies: Vec<Reply<TxStatus>>) {
        self.tx_script.lock().extend(replies);
    }

    pub(crate) fn set_default_tx(&self, status: TxStatus) {
        *self.default_tx.lock() = status;
    }

    pub(crate) fn script_chain(&self, replies: Vec<Reply<BlockchainStatus>>) {
        self.chain_script.lock().extend(replies);
    }

    pub(crate) fn set_default_chain(&self, status: BlockchainStatus) {
        *self.default_chain.lock() = status;
    }

    pub(crate) fn script_bootstrapped(&self, replies: Vec<Reply<bool>>) {
        self.bootstrap_script.lock().extend(replies);
    }

    pub(crate) fn tx_queries(&self) -> usize {
        self.tx_queries.load(Ordering::SeqCst)
    }

    pub(crate) fn chain_queries(&self) -> usize {
        self.chain_queries.load(Ordering::SeqCst)
    }

    pub(crate) fn bootstrap_queries(&self) -> usize {
        self.bootstrap_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeystoreApi for MockApi {
    async fn create_user(&self, _user: &UserPass) -> SubnetliteResult<bool> {
        self.ledger.record(LedgerEvent::CreateUser {
            node: self.node.clone(),
        });
        Ok(!self.ledger.refuse_user.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl PlatformApi for MockApi {
    async fn import_key(&self, _user: &UserPass, _private_key: &str) -> SubnetliteResult<String> {
        self.ledger.record(LedgerEvent::ImportKey {
            node: self.node.clone(),
        });
        if self.ledger.reject_key.load(Ordering::SeqCst) {
            return Err(SubnetliteError::Api("invalid private key".into()));
        }
        Ok(FUNDED_ADDRESS.to_string())
    }

    async fn create_subnet(&self, request: &CreateSubnetRequest) -> SubnetliteResult<Id> {
        let tx_id = self.ledger.submit("create_subnet")?;
        self.ledger.subnet_requests.lock().push(request.clone());
        self.ledger.subnets.lock().push(MockLedger::SUBNET_ID);
        Ok(tx_id)
    }

    async fn add_subnet_validator(
        &self,
        request: &AddSubnetValidatorRequest,
    ) -> SubnetliteResult<Id> {
        let tx_id = self.ledger.submit("add_subnet_validator")?;
        self.ledger.validator_requests.lock().push(request.clone());
        Ok(tx_id)
    }

    async fn create_blockchain(&self, request: &CreateBlockchainRequest) -> SubnetliteResult<Id> {
        let tx_id = self.ledger.submit("create_blockchain")?;
        self.ledger.chain_requests.lock().push(request.clone());
        Ok(tx_id)
    }

    async fn get_tx_status(&self, tx_id: &Id) -> SubnetliteResult<TxStatus> {
        self.tx_queries.fetch_add(1, Ordering::SeqCst);
        let reply = self.tx_script.lock().pop_front().unwrap_or_else(|| {
            let mut polls = self.tx_polls.lock();
            let seen = polls.entry(*tx_id).or_insert(0);
            *seen += 1;
            if *seen <= self.ledger.pending_polls(tx_id) {
                Reply::Value(TxStatus::Processing)
            } else {
                Reply::Value(*self.default_tx.lock())
            }
        });
        let status = reply.into_result()?;
        if status == TxStatus::Committed {
            self.ledger.record(LedgerEvent::Committed {
                node: self.node.clone(),
                tx_id: *tx_id,
            });
        }
        Ok(status)
    }

    async fn get_blockchain_status(&self, _chain_id: &Id) -> SubnetliteResult<BlockchainStatus> {
        self.chain_queries.fetch_add(1, Ordering::SeqCst);
        self.chain_script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Reply::Value(*self.default_chain.lock()))
            .into_result()
    }

    async fn get_subnets(&self, ids: &[Id]) -> SubnetliteResult<Vec<SubnetInfo>> {
        if self.ledger.hide_subnet.load(Ordering::SeqCst) {
            return Ok(Vec::new());
        }
        Ok(self
            .ledger
            .subnets
            .lock()
            .iter()
            .filter(|id| ids.contains(id))
            .map(|id| SubnetInfo {
                id: *id,
                control_keys: vec![FUNDED_ADDRESS.to_string()],
                threshold: 1,
            })
            .collect())
    }
}

#[async_trait]
impl InfoApi for MockApi {
    async fn is_bootstrapped(&self, _chain_id: &Id) -> SubnetliteResult<bool> {
        self.bootstrap_queries.fetch_add(1, Ordering::SeqCst);
        self.bootstrap_script
            .lock()
            .pop_front()
            .unwrap_or(Reply::Value(true))
            .into_result()
    }
}

struct MockClient(Arc<MockApi>);

impl ApiClient for MockClient {
    fn keystore(&self) -> Arc<dyn KeystoreApi> {
        self.0.clone()
    }

    fn platform(&self) -> Arc<dyn PlatformApi> {
        self.0.clone()
    }

    fn info(&self) -> Arc<dyn InfoApi> {
        self.0.clone()
    }
}

/// A fleet of mock nodes named `node-0`, `node-1`, ...
pub(crate) struct MockFleet {
    pub ledger: Arc<MockLedger>,
    apis: Vec<Arc<MockApi>>,
    nodes: Vec<Arc<dyn Node>>,
}

impl MockFleet {
    pub(crate) fn new(count: usize) -> Self {
        let ledger = Arc::new(MockLedger::default());
        let mut apis = Vec::with_capacity(count);
        let mut nodes: Vec<Arc<dyn Node>> = Vec::with_capacity(count);

        for i in 0..count {
            let name = format!("node-{}", i);
            let api = Arc::new(MockApi::new(name.clone(), Arc::clone(&ledger)));
            let node = StaticNode::new(
                name,
                NodeId::new([i as u8 + 1; 20]),
                "127.0.0.1",
                9650 + 2 * i as u16,
                Arc::new(MockClient(Arc::clone(&api))),
            );
            apis.push(api);
            nodes.push(Arc::new(node));
        }

        Self {
            ledger,
            apis,
            nodes,
        }
    }

    pub(crate) fn network(&self) -> LocalNetwork {
        LocalNetwork::new(self.nodes.iter().cloned()).unwrap()
    }

    pub(crate) fn fleet(&self) -> Fleet {
        self.nodes
            .iter()
            .map(|node| (node.name().to_string(), Arc::clone(node)))
            .collect()
    }

    pub(crate) fn node(&self, index: usize) -> Arc<dyn Node> {
        Arc::clone(&self.nodes[index])
    }

    pub(crate) fn client(&self, index: usize) -> Arc<MockApi> {
        Arc::clone(&self.apis[index])
    }
}
