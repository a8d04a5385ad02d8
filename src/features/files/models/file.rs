use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for stored file metadata
#[derive(Debug, Clone, FromRow)]
pub struct File {
    pub id: Uuid,
    pub created_by: Option<String>,
    pub path: String,
    pub original_path: String,
    pub is_private: bool,
    pub provider: String,
    pub region: String,
    pub bucket: String,
    pub filename: String,
    pub encoding: String,
    pub mimetype: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// File metadata before the repository assigns an id and timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFile {
    pub created_by: Option<String>,
    pub path: String,
    pub original_path: String,
    pub is_private: bool,
    pub provider: String,
    pub region: String,
    pub bucket: String,
    pub filename: String,
    pub encoding: String,
    pub mimetype: String,
}
