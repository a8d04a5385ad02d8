use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::{AsyncRead, AsyncReadExt};
use uuid::Uuid;

use crate::core::config::StorageDriver;
use crate::core::error::{AppError, Result};
use crate::features::files::models::{File, NewFile};
use crate::features::files::repositories::FileRepository;
use crate::modules::storage::{PutOptions, PutResponse, StorageDisk, StorageError};

/// Variable lookup backed by a fixed list instead of the process environment
pub fn env_lookup(vars: Vec<(&'static str, &'static str)>) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    move |name: &str| vars.get(name).cloned()
}

/// Disk keeping objects in memory
pub struct MemoryDisk {
    driver: StorageDriver,
    fail: bool,
    objects: Mutex<HashMap<String, (Vec<u8>, Option<String>)>>,
}

impl MemoryDisk {
    pub fn new(driver: StorageDriver) -> Self {
        Self {
            driver,
            fail: false,
            objects: Mutex::new(HashMap::new()),
        }
    }

    /// A disk whose every write fails
    pub fn failing(driver: StorageDriver) -> Self {
        Self {
            fail: true,
            ..Self::new(driver)
        }
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(data, _)| data.clone())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .and_then(|(_, content_type)| content_type.clone())
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl StorageDisk for MemoryDisk {
    fn driver(&self) -> StorageDriver {
        self.driver
    }

    fn bucket(&self) -> &str {
        "test-bucket"
    }

    fn region(&self) -> &str {
        "test-region"
    }

    async fn put(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        options: &PutOptions,
    ) -> std::result::Result<PutResponse, StorageError> {
        if self.fail {
            return Err(StorageError::Upload("simulated backend outage".to_string()));
        }

        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;

        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data, options.content_type.clone()));

        Ok(PutResponse {
            key: key.to_string(),
            bucket: self.bucket().to_string(),
        })
    }
}

/// Repository keeping records in memory, in insertion order
#[derive(Default)]
pub struct MemoryFileRepository {
    fail: bool,
    files: Mutex<Vec<File>>,
}

impl MemoryFileRepository {
    /// A repository whose every insert fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl FileRepository for MemoryFileRepository {
    async fn insert(&self, file: NewFile) -> Result<File> {
        if self.fail {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let now = Utc::now();
        let file = File {
            id: Uuid::now_v7(),
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
            created_at: now,
            updated_at: now,
        };

        self.files.lock().unwrap().push(file.clone());
        Ok(file)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<File>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == id)
            .cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<File>, i64)> {
        let files = self.files.lock().unwrap();
        let page = files
            .iter()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();

        Ok((page, files.len() as i64))
    }
}
