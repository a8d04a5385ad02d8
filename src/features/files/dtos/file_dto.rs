use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::files::models::{File, NewFile};

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler streams axum's Multipart fields directly.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload; repeat the field to upload several files
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Mark the following files as private (default: false)
    #[schema(example = false)]
    pub is_private: Option<bool>,
    /// Identifier of the uploader, stored as-is
    pub created_by: Option<String>,
}

/// Metadata accompanying one uploaded byte stream
#[derive(Debug, Clone, Default)]
pub struct UploadMeta {
    /// Original filename as sent by the client
    pub filename: Option<String>,
    /// Transfer encoding of the part
    pub encoding: String,
    /// MIME type of the part
    pub mimetype: String,
    pub is_private: Option<bool>,
    pub created_by: Option<String>,
}

/// Response DTO for file metadata
///
/// `id`, `createdAt` and `updatedAt` are absent when metadata persistence
/// is disabled.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponseDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Object key in the bucket
    pub path: String,
    /// Slugified original filename
    pub original_path: String,
    pub is_private: bool,
    /// Storage driver name (s3, do, gcs, local)
    pub provider: String,
    pub region: String,
    pub bucket: String,
    /// Generated storage key
    pub filename: String,
    pub encoding: String,
    pub mimetype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<File> for FileResponseDto {
    fn from(file: File) -> Self {
        Self {
            id: Some(file.id),
            created_by: file.created_by,
            path: file.path,
            original_path: file.original_path,
            is_private: file.is_private,
            provider: file.provider,
            region: file.region,
            bucket: file.bucket,
            filename: file.filename,
            encoding: file.encoding,
            mimetype: file.mimetype,
            created_at: Some(file.created_at),
            updated_at: Some(file.updated_at),
        }
    }
}

impl From<NewFile> for FileResponseDto {
    fn from(file: NewFile) -> Self {
        Self {
            id: None,
            created_by: file.created_by,
            path: file.path,
            original_path: file.original_path,
            is_private: file.is_private,
            provider: file.provider,
            region: file.region,
            bucket: file.bucket,
            filename: file.filename,
            encoding: file.encoding,
            mimetype: file.mimetype,
            created_at: None,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_file() -> NewFile {
        NewFile {
            created_by: None,
            path: "2024/03/07/090502/logo.png".to_string(),
            original_path: "logo.png".to_string(),
            is_private: false,
            provider: "do".to_string(),
            region: "nyc3".to_string(),
            bucket: "uploads".to_string(),
            filename: "2024/03/07/090502/logo.png".to_string(),
            encoding: "7bit".to_string(),
            mimetype: "image/png".to_string(),
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(FileResponseDto::from(new_file())).unwrap();

        assert_eq!(json["originalPath"], "logo.png");
        assert_eq!(json["isPrivate"], false);
        assert_eq!(json["mimetype"], "image/png");
        assert!(json.get("original_path").is_none());
    }

    #[test]
    fn test_unpersisted_record_omits_persistence_fields() {
        let json = serde_json::to_value(FileResponseDto::from(new_file())).unwrap();

        assert!(json.get("id").is_none());
        assert!(json.get("createdAt").is_none());
        assert!(json.get("createdBy").is_none());
    }

    #[test]
    fn test_persisted_record_carries_id() {
        let now = Utc::now();
        let id = Uuid::now_v7();
        let base = new_file();
        let file = File {
            id,
            created_by: Some("user-1".to_string()),
            path: base.path,
            original_path: base.original_path,
            is_private: true,
            provider: base.provider,
            region: base.region,
            bucket: base.bucket,
            filename: base.filename,
            encoding: base.encoding,
            mimetype: base.mimetype,
            created_at: now,
            updated_at: now,
        };

        let dto = FileResponseDto::from(file);
        assert_eq!(dto.id, Some(id));
        assert_eq!(dto.created_by.as_deref(), Some("user-1"));
        assert!(dto.is_private);
        assert_eq!(dto.created_at, Some(now));
    }
}
