//! Genesis payload loading.

use async_trait::async_trait;
use std::path::Path;
use subnetlite_shared::{SubnetliteError, SubnetliteResult};

/// Source of a chain's genesis bytes.
#[async_trait]
pub trait GenesisLoader: Send + Sync {
    async fn read(&self, path: &Path) -> SubnetliteResult<Vec<u8>>;
}

/// Reads genesis files from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsGenesisLoader;

#[async_trait]
impl GenesisLoader for FsGenesisLoader {
    async fn read(&self, path: &Path) -> SubnetliteResult<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| {
            SubnetliteError::from(e)
                .context(format!("could not read genesis file ({})", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.json");
        std::fs::write(&path, br#"{"data":"hello"}"#).unwrap();

        let bytes = FsGenesisLoader.read(&path).await.unwrap();
        assert_eq!(bytes, br#"{"data":"hello"}"#);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = FsGenesisLoader.read(&path).await.unwrap_err();
        assert!(matches!(err.root_cause(), SubnetliteError::Io(_)));
        assert!(err.to_string().contains("missing.json"));
    }
}
