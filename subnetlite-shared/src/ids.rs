//! Ledger and node identifiers.
//!
//! `Id` names transactions, subnets and chains (32 bytes). `NodeId` names a
//! node (20 bytes, `NodeID-` prefix). Both use the ledger's CB58 text form:
//! base58 of the bytes followed by the last 4 bytes of their sha256.

use crate::errors::{SubnetliteError, SubnetliteResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

pub const ID_LEN: usize = 32;
pub const NODE_ID_LEN: usize = 20;
pub const NODE_ID_PREFIX: &str = "NodeID-";

const CHECKSUM_LEN: usize = 4;

/// 32-byte ledger identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id([u8; ID_LEN]);

impl Id {
    pub const EMPTY: Id = Id([0; ID_LEN]);

    pub const fn new(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl FromStr for Id {
    type Err = SubnetliteError;

    fn from_str(s: &str) -> SubnetliteResult<Self> {
        decode_cb58::<ID_LEN>(s)
            .map(Self)
            .map_err(|e| SubnetliteError::InvalidArgument(format!("invalid id '{}': {}", s, e)))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_cb58(&self.0))
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self)
    }
}

/// 20-byte node identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId([u8; NODE_ID_LEN]);

impl NodeId {
    pub const fn new(bytes: [u8; NODE_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NODE_ID_LEN] {
        &self.0
    }
}

impl FromStr for NodeId {
    type Err = SubnetliteError;

    /// Accepts both the prefixed and the bare form.
    fn from_str(s: &str) -> SubnetliteResult<Self> {
        let raw = s.strip_prefix(NODE_ID_PREFIX).unwrap_or(s);
        decode_cb58::<NODE_ID_LEN>(raw).map(Self).map_err(|e| {
            SubnetliteError::InvalidArgument(format!("invalid node id '{}': {}", s, e))
        })
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", NODE_ID_PREFIX, encode_cb58(&self.0))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self)
    }
}

// Both ids travel as their text form.
macro_rules! serde_as_text {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse::<$ty>().map_err(serde::de::Error::custom)
            }
        }
    };
}

serde_as_text!(Id);
serde_as_text!(NodeId);

fn checksum(bytes: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(bytes);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    out
}

fn encode_cb58(bytes: &[u8]) -> String {
    let mut payload = Vec::with_capacity(bytes.len() + CHECKSUM_LEN);
    payload.extend_from_slice(bytes);
    payload.extend_from_slice(&checksum(bytes));
    bs58::encode(payload).into_string()
}

fn decode_cb58<const N: usize>(s: &str) -> Result<[u8; N], String> {
    let raw = bs58::decode(s).into_vec().map_err(|e| e.to_string())?;
    if raw.len() != N + CHECKSUM_LEN {
        return Err(format!(
            "expected {} bytes with checksum, got {}",
            N + CHECKSUM_LEN,
            raw.len()
        ));
    }
    let (bytes, sum) = raw.split_at(N);
    if sum != checksum(bytes) {
        return Err("checksum mismatch".to_string());
    }
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}
