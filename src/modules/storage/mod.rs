//! Storage module for file management
//!
//! A disk is one configured storage backend. S3, DigitalOcean Spaces and
//! GCS all speak the S3 API and share [`S3Disk`]; the local driver writes
//! to the filesystem through [`LocalDisk`].

mod local_disk;
mod s3_disk;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;
use tracing::info;

use crate::core::config::{DiskConfig, StorageDriver, StorageManagerConfig};

pub use local_disk::LocalDisk;
pub use s3_disk::S3Disk;

/// Errors returned by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to initialize disk: {0}")]
    Init(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Unknown disk: {0}")]
    UnknownDisk(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options forwarded to a disk on write
#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    pub content_type: Option<String>,
}

/// Location of an object after a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutResponse {
    pub key: String,
    pub bucket: String,
}

/// A configured storage backend
#[async_trait]
pub trait StorageDisk: Send + Sync {
    fn driver(&self) -> StorageDriver;

    fn bucket(&self) -> &str;

    fn region(&self) -> &str;

    /// Stream `reader` to the backend under `key`
    ///
    /// The reader is consumed until EOF. Failures are returned as-is; the
    /// disk does not retry and does not clean up partially written objects.
    async fn put(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        options: &PutOptions,
    ) -> Result<PutResponse, StorageError>;
}

/// Every configured disk, addressable by name
pub struct StorageManager {
    default: Arc<dyn StorageDisk>,
    disks: HashMap<String, Arc<dyn StorageDisk>>,
}

impl StorageManager {
    pub fn from_config(config: &StorageManagerConfig) -> Result<Self, StorageError> {
        let mut disks = HashMap::with_capacity(config.disks.len());
        for (name, disk_config) in &config.disks {
            disks.insert(name.clone(), build_disk(disk_config)?);
        }

        let default = disks
            .get(&config.default)
            .cloned()
            .ok_or_else(|| StorageError::UnknownDisk(config.default.clone()))?;

        info!(
            "Storage initialized: default disk '{}' ({}), bucket '{}'",
            config.default,
            default.driver(),
            default.bucket()
        );

        Ok(Self { default, disks })
    }

    /// Get a disk by name, or the default disk when `name` is `None`
    pub fn disk(&self, name: Option<&str>) -> Result<Arc<dyn StorageDisk>, StorageError> {
        match name {
            None => Ok(Arc::clone(&self.default)),
            Some(name) => self
                .disks
                .get(name)
                .cloned()
                .ok_or_else(|| StorageError::UnknownDisk(name.to_string())),
        }
    }
}

fn build_disk(config: &DiskConfig) -> Result<Arc<dyn StorageDisk>, StorageError> {
    match config.driver {
        StorageDriver::Local => Ok(Arc::new(LocalDisk::new(config))),
        StorageDriver::S3 | StorageDriver::DigitalOcean | StorageDriver::Gcs => {
            Ok(Arc::new(S3Disk::new(config)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DiskCredentials;

    fn disk_config(driver: StorageDriver) -> DiskConfig {
        DiskConfig {
            driver,
            config: DiskCredentials {
                key: "access".to_string(),
                secret: "secret".to_string(),
                endpoint: "http://localhost:9000".to_string(),
                bucket: "uploads".to_string(),
                region: "us-east-1".to_string(),
            },
            path_style: true,
        }
    }

    fn manager_config(entries: Vec<(&str, StorageDriver)>, default: &str) -> StorageManagerConfig {
        StorageManagerConfig {
            default: default.to_string(),
            disks: entries
                .into_iter()
                .map(|(name, driver)| (name.to_string(), disk_config(driver)))
                .collect(),
        }
    }

    #[test]
    fn test_default_disk_is_returned_without_name() {
        let manager =
            StorageManager::from_config(&manager_config(vec![("local", StorageDriver::Local)], "local"))
                .unwrap();

        let disk = manager.disk(None).unwrap();
        assert_eq!(disk.driver(), StorageDriver::Local);
        assert_eq!(disk.bucket(), "uploads");
        assert_eq!(disk.region(), "us-east-1");
    }

    #[test]
    fn test_disk_lookup_by_name() {
        let manager = StorageManager::from_config(&manager_config(
            vec![("local", StorageDriver::Local), ("s3", StorageDriver::S3)],
            "local",
        ))
        .unwrap();

        assert_eq!(manager.disk(Some("s3")).unwrap().driver(), StorageDriver::S3);
        assert!(matches!(
            manager.disk(Some("gcs")),
            Err(StorageError::UnknownDisk(name)) if name == "gcs"
        ));
    }

    #[test]
    fn test_missing_default_disk_is_rejected() {
        let result =
            StorageManager::from_config(&manager_config(vec![("local", StorageDriver::Local)], "s3"));
        assert!(matches!(result, Err(StorageError::UnknownDisk(name)) if name == "s3"));
    }
}
