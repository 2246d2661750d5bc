//! Types shared between subnetlite crates.

pub mod errors;
pub mod ids;

pub use errors::{SubnetliteError, SubnetliteResult};
pub use ids::{Id, NodeId};
