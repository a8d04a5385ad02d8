use std::sync::Arc;

use tokio::io::AsyncRead;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{FileResponseDto, UploadMeta};
use crate::features::files::models::NewFile;
use crate::features::files::repositories::FileRepository;
use crate::modules::storage::{PutOptions, StorageDisk};
use crate::shared::filename::{generate_filename, random_name, slugify};
use crate::shared::types::PaginationQuery;

/// Service for file operations
pub struct FileService {
    disk: Arc<dyn StorageDisk>,
    repository: Option<Arc<dyn FileRepository>>,
}

impl FileService {
    /// `repository` is `None` when metadata persistence is disabled
    pub fn new(disk: Arc<dyn StorageDisk>, repository: Option<Arc<dyn FileRepository>>) -> Self {
        Self { disk, repository }
    }

    pub fn persistence_enabled(&self) -> bool {
        self.repository.is_some()
    }

    /// Upload a byte stream to the disk and record its metadata
    ///
    /// The object key is derived from the original filename and the current
    /// UTC time. Storage and database failures are returned unchanged; an
    /// object whose metadata insert fails stays in the bucket.
    pub async fn upload(
        &self,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        meta: UploadMeta,
    ) -> Result<FileResponseDto> {
        // Names that slugify to nothing would produce a key ending in '/'
        let original_name = meta
            .filename
            .filter(|name| !slugify(name).is_empty())
            .unwrap_or_else(random_name);
        let key = generate_filename(&original_name);

        let options = PutOptions {
            content_type: Some(meta.mimetype.clone()),
        };
        let stored = self.disk.put(&key, reader, &options).await?;

        debug!(
            "File stored: disk={}, bucket={}, key={}",
            self.disk.driver(),
            stored.bucket,
            stored.key
        );

        let new_file = NewFile {
            created_by: meta.created_by,
            path: stored.key,
            original_path: slugify(&original_name),
            is_private: meta.is_private.unwrap_or(false),
            provider: self.disk.driver().to_string(),
            region: self.disk.region().to_string(),
            bucket: stored.bucket,
            filename: key,
            encoding: meta.encoding,
            mimetype: meta.mimetype,
        };

        let Some(repository) = &self.repository else {
            return Ok(new_file.into());
        };

        let file = repository.insert(new_file).await?;

        info!(
            "File metadata saved: id={}, path={}, bucket={}",
            file.id, file.path, file.bucket
        );

        Ok(file.into())
    }

    /// Get the metadata of a single file
    pub async fn get(&self, id: Uuid) -> Result<FileResponseDto> {
        let repository = self.repository()?;

        repository
            .find_by_id(id)
            .await?
            .map(FileResponseDto::from)
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    /// List file metadata, newest first
    pub async fn list(&self, query: &PaginationQuery) -> Result<(Vec<FileResponseDto>, i64)> {
        let repository = self.repository()?;

        let (files, total) = repository.list(query.limit(), query.offset()).await?;

        Ok((files.into_iter().map(FileResponseDto::from).collect(), total))
    }

    fn repository(&self) -> Result<&Arc<dyn FileRepository>> {
        self.repository
            .as_ref()
            .ok_or_else(|| AppError::NotFound("File metadata persistence is disabled".to_string()))
    }
}
