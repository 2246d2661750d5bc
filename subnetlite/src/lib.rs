//! Subnet bootstrap orchestration.
//!
//! Given a fleet of running validator nodes, [`setup_subnet`] creates a
//! subnet, registers every node as its validator, creates a custom chain on
//! it and waits until every node validates and has bootstrapped that chain.
//!
//! Every submitted transaction is issued once through a single node. All
//! waiting is done by polling every node through the [`confirm`] engine,
//! bounded by the caller's [`Cancellation`].

pub mod api;
pub mod cancel;
pub mod confirm;
pub mod logging;
pub mod network;
pub mod pipeline;
pub mod setup;

#[cfg(test)]
pub(crate) mod testing;

pub use cancel::Cancellation;
pub use logging::{LoggingOptions, init_logging};
pub use network::{Fleet, LocalNetwork, Network, Node, StaticNode};
pub use setup::{
    CustomVm, FsGenesisLoader, GenesisLoader, RegistrationMode, SetupOptions, SetupReport,
    SubnetSetup, setup_subnet,
};
pub use subnetlite_shared::{Id, NodeId, SubnetliteError, SubnetliteResult};

// ============================================================================
// THREAD SAFETY ASSERTIONS
// ============================================================================

const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<Cancellation>;
    let _ = assert_send_sync::<LocalNetwork>;
    let _ = assert_send_sync::<SubnetSetup>;
};
