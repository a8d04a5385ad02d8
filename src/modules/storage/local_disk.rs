//! Local filesystem disk
//!
//! The configured endpoint is the root directory; objects are written to
//! `<endpoint>/<bucket>/<key>`.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::debug;

use super::{PutOptions, PutResponse, StorageDisk, StorageError};
use crate::core::config::{DiskConfig, StorageDriver};

pub struct LocalDisk {
    root: PathBuf,
    bucket: String,
    region: String,
}

impl LocalDisk {
    pub fn new(config: &DiskConfig) -> Self {
        Self {
            root: PathBuf::from(&config.config.endpoint),
            bucket: config.config.bucket.clone(),
            region: config.config.region.clone(),
        }
    }

    /// Resolve `key` below the bucket directory
    ///
    /// Every `/`-separated segment must be a plain name: empty, `.` and `..`
    /// segments are rejected so writes cannot leave the bucket directory.
    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let mut path = self.root.join(&self.bucket);
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                return Err(StorageError::InvalidKey(key.to_string()));
            }
            path.push(segment);
        }
        Ok(path)
    }
}

#[async_trait]
impl StorageDisk for LocalDisk {
    fn driver(&self) -> StorageDriver {
        StorageDriver::Local
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn region(&self) -> &str {
        &self.region
    }

    async fn put(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        _options: &PutOptions,
    ) -> Result<PutResponse, StorageError> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&path).await?;
        let written = tokio::io::copy(reader, &mut file).await?;
        file.flush().await?;

        debug!("Wrote {} bytes to {}", written, path.display());

        Ok(PutResponse {
            key: key.to_string(),
            bucket: self.bucket.clone(),
        })
    }
}
