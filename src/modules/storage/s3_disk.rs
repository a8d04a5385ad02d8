//! S3-compatible storage disk
//!
//! Serves the `s3`, `do` and `gcs` drivers: DigitalOcean Spaces and the
//! GCS interoperability endpoint accept the same signed requests as S3,
//! so only the endpoint and credentials differ.
//!
//! Uses rust-s3 crate for lightweight S3 operations.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tokio::io::AsyncRead;
use tracing::{debug, info};

use super::{PutOptions, PutResponse, StorageDisk, StorageError};
use crate::core::config::{DiskConfig, StorageDriver};
use crate::shared::constants::DEFAULT_MIME_TYPE;

/// S3-compatible storage disk
pub struct S3Disk {
    driver: StorageDriver,
    bucket: Box<Bucket>,
    bucket_name: String,
    region: String,
}

impl S3Disk {
    /// Create a disk from configuration
    ///
    /// No request is sent here; credentials are checked on the first write.
    pub fn new(config: &DiskConfig) -> Result<Self, StorageError> {
        let settings = &config.config;

        let credentials = Credentials::new(
            Some(&settings.key),
            Some(&settings.secret),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Init(format!("Failed to create credentials: {}", e)))?;

        let region = Region::Custom {
            region: settings.region.clone(),
            endpoint: settings.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&settings.bucket, region, credentials).map_err(|e| {
            StorageError::Init(format!("Failed to open bucket '{}': {}", settings.bucket, e))
        })?;

        // Path-style URLs (http://endpoint/bucket instead of http://bucket.endpoint)
        if config.path_style {
            bucket.set_path_style();
        }

        info!(
            "{} disk initialized for endpoint: {}, bucket: {}, path_style: {}",
            config.driver, settings.endpoint, settings.bucket, config.path_style
        );

        Ok(Self {
            driver: config.driver,
            bucket,
            bucket_name: settings.bucket.clone(),
            region: settings.region.clone(),
        })
    }
}

#[async_trait]
impl StorageDisk for S3Disk {
    fn driver(&self) -> StorageDriver {
        self.driver
    }

    fn bucket(&self) -> &str {
        &self.bucket_name
    }

    fn region(&self) -> &str {
        &self.region
    }

    async fn put(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        options: &PutOptions,
    ) -> Result<PutResponse, StorageError> {
        let content_type = options.content_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE);
        let mut reader = reader;

        self.bucket
            .put_object_stream_with_content_type(&mut reader, key, content_type)
            .await
            .map_err(|e| StorageError::Upload(format!("Failed to upload file '{}': {}", key, e)))?;

        debug!("Uploaded file '{}' to bucket '{}'", key, self.bucket_name);

        Ok(PutResponse {
            key: key.to_string(),
            bucket: self.bucket_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DiskCredentials;

    #[test]
    fn test_new_keeps_bucket_and_region() {
        let config = DiskConfig {
            driver: StorageDriver::DigitalOcean,
            config: DiskCredentials {
                key: "access".to_string(),
                secret: "secret".to_string(),
                endpoint: "https://nyc3.digitaloceanspaces.com".to_string(),
                bucket: "uploads".to_string(),
                region: "nyc3".to_string(),
            },
            path_style: false,
        };

        let disk = S3Disk::new(&config).unwrap();
        assert_eq!(disk.driver(), StorageDriver::DigitalOcean);
        assert_eq!(disk.bucket(), "uploads");
        assert_eq!(disk.region(), "nyc3");
    }
}
