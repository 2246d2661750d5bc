//! Workflow inputs: the custom VM descriptor and tunable options.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use subnetlite_shared::{SubnetliteError, SubnetliteResult};

/// Default values for [`SetupOptions`].
pub mod constants {
    /// Fast poll interval for transaction and bootstrap checks.
    pub const API_RETRY_INTERVAL_MS: u64 = 1_000;

    /// Initial poll interval for the validating check, before any node
    /// has confirmed.
    pub const VALIDATING_INITIAL_INTERVAL_MS: u64 = 10_000;

    /// Control-key signatures required for subnet changes.
    pub const KEY_THRESHOLD: u32 = 1;

    pub const VALIDATOR_WEIGHT: u64 = 3_000;

    /// Validation starts this long after registration.
    pub const VALIDATOR_START_OFFSET_SECS: u64 = 30;

    /// Validation ends this long after registration (30 days).
    pub const VALIDATOR_END_OFFSET_SECS: u64 = 30 * 24 * 60 * 60;
}

/// A custom VM to run on a new subnet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomVm {
    /// Path to the VM binary. Installing it on the nodes is the fleet's job.
    #[serde(default)]
    pub path: PathBuf,
    /// Path to the chain's genesis file.
    pub genesis: PathBuf,
    /// Human-readable chain name.
    pub name: String,
    /// Subnet the chain runs on, in text form.
    pub subnet_id: String,
    /// Identifier of the VM type.
    pub id: String,
}

impl CustomVm {
    pub fn from_json(json: &str) -> SubnetliteResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            SubnetliteError::Serialization(format!("invalid custom VM descriptor: {}", e))
        })
    }

    /// Load a descriptor from a JSON file.
    pub fn load(path: &Path) -> SubnetliteResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            SubnetliteError::from(e).context(format!(
                "could not read custom VM descriptor ({})",
                path.display()
            ))
        })?;
        Self::from_json(&json)
    }
}

/// How validator registrations are submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationMode {
    /// Submit one registration, confirm it on every node, then the next.
    #[default]
    Sequential,
    /// Submit every registration up front, then confirm them all.
    Batched,
}

/// Tunables for a setup run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupOptions {
    pub api_retry_interval_ms: u64,
    pub validating_initial_interval_ms: u64,
    pub key_threshold: u32,
    pub validator_weight: u64,
    pub validator_start_offset_secs: u64,
    pub validator_end_offset_secs: u64,
    pub registration: RegistrationMode,
    /// Deadline for subnet creation, on top of the caller's.
    pub subnet_timeout_secs: Option<u64>,
    /// Deadline for validator registration, on top of the caller's.
    pub validators_timeout_secs: Option<u64>,
    /// Deadline for finalization, on top of the caller's.
    pub finalize_timeout_secs: Option<u64>,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            api_retry_interval_ms: constants::API_RETRY_INTERVAL_MS,
            validating_initial_interval_ms: constants::VALIDATING_INITIAL_INTERVAL_MS,
            key_threshold: constants::KEY_THRESHOLD,
            validator_weight: constants::VALIDATOR_WEIGHT,
            validator_start_offset_secs: constants::VALIDATOR_START_OFFSET_SECS,
            validator_end_offset_secs: constants::VALIDATOR_END_OFFSET_SECS,
            registration: RegistrationMode::Sequential,
            subnet_timeout_secs: None,
            validators_timeout_secs: None,
            finalize_timeout_secs: None,
        }
    }
}

impl SetupOptions {
    pub fn from_json(json: &str) -> SubnetliteResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SubnetliteError::Serialization(format!("invalid setup options: {}", e)))
    }

    /// Reject values the workflow cannot run with.
    pub fn sanitize(&self) -> SubnetliteResult<()> {
        if self.api_retry_interval_ms == 0 {
            return Err(SubnetliteError::InvalidArgument(
                "api_retry_interval_ms must be greater than zero".into(),
            ));
        }
        if self.validating_initial_interval_ms == 0 {
            return Err(SubnetliteError::InvalidArgument(
                "validating_initial_interval_ms must be greater than zero".into(),
            ));
        }
        if self.key_threshold == 0 {
            return Err(SubnetliteError::InvalidArgument(
                "key_threshold must be at least 1".into(),
            ));
        }
        if self.validator_weight == 0 {
            return Err(SubnetliteError::InvalidArgument(
                "validator_weight must be greater than zero".into(),
            ));
        }
        if self.validator_end_offset_secs <= self.validator_start_offset_secs {
            return Err(SubnetliteError::InvalidArgument(format!(
                "validator end offset ({}s) must be after start offset ({}s)",
                self.validator_end_offset_secs, self.validator_start_offset_secs
            )));
        }
        Ok(())
    }

    pub fn api_retry_interval(&self) -> Duration {
        Duration::from_millis(self.api_retry_interval_ms)
    }

    pub fn validating_initial_interval(&self) -> Duration {
        Duration::from_millis(self.validating_initial_interval_ms)
    }

    pub fn subnet_timeout(&self) -> Option<Duration> {
        self.subnet_timeout_secs.map(Duration::from_secs)
    }

    pub fn validators_timeout(&self) -> Option<Duration> {
        self.validators_timeout_secs.map(Duration::from_secs)
    }

    pub fn finalize_timeout(&self) -> Option<Duration> {
        self.finalize_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        let options = SetupOptions::default();
        options.sanitize().unwrap();
        assert_eq!(options.api_retry_interval(), Duration::from_secs(1));
        assert_eq!(options.registration, RegistrationMode::Sequential);
        assert!(options.finalize_timeout().is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options =
            SetupOptions::from_json(r#"{"validator_weight": 20, "registration": "batched"}"#)
                .unwrap();
        assert_eq!(options.validator_weight, 20);
        assert_eq!(options.registration, RegistrationMode::Batched);
        assert_eq!(options.key_threshold, constants::KEY_THRESHOLD);
    }

    #[test]
    fn test_sanitize_rejects_bad_values() {
        let cases = [
            SetupOptions {
                api_retry_interval_ms: 0,
                ..Default::default()
            },
            SetupOptions {
                key_threshold: 0,
                ..Default::default()
            },
            SetupOptions {
                validator_weight: 0,
                ..Default::default()
            },
            SetupOptions {
                validator_start_offset_secs: 60,
                validator_end_offset_secs: 60,
                ..Default::default()
            },
        ];
        for options in cases {
            let err = options.sanitize().unwrap_err();
            assert!(matches!(err, SubnetliteError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_custom_vm_from_json() {
        let vm = CustomVm::from_json(
            r#"{
                "genesis": "/tmp/genesis.json",
                "name": "timestampvm",
                "subnet_id": "abcd",
                "id": "tGas3T58KzdjLHhBDMnH2TvrddhqTji5iZAMZ3RXs2NLpSnhH"
            }"#,
        )
        .unwrap();
        assert_eq!(vm.name, "timestampvm");
        assert_eq!(vm.genesis, PathBuf::from("/tmp/genesis.json"));
        assert_eq!(vm.path, PathBuf::new());
    }

    #[test]
    fn test_custom_vm_rejects_missing_fields() {
        let err = CustomVm::from_json(r#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(err, SubnetliteError::Serialization(_)));
    }

    #[test]
    fn test_custom_vm_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CustomVm::load(&dir.path().join("vm.json")).unwrap_err();
        assert!(matches!(err.root_cause(), SubnetliteError::Io(_)));
    }
}
