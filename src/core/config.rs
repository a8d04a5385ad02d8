use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::shared::validation::IDENTIFIER_REGEX;

/// Errors raised while loading configuration at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("[{0}] is required, currently it's missing or empty")]
    Missing(&'static str),

    #[error("[{var}] is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageManagerConfig,
    pub database: DatabaseOptions,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Metadata persistence settings
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub enabled: bool,
    /// Present whenever `enabled` is true
    pub connection: Option<DatabaseConfig>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
    pub table: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum StorageDriver {
    /// Amazon S3 or any S3-compatible service (MinIO, R2, ...)
    #[default]
    #[serde(rename = "s3")]
    S3,
    /// DigitalOcean Spaces
    #[serde(rename = "do")]
    DigitalOcean,
    /// Google Cloud Storage through its S3 interoperability API
    #[serde(rename = "gcs")]
    Gcs,
    /// Local filesystem
    #[serde(rename = "local")]
    Local,
}

impl StorageDriver {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageDriver::S3 => "s3",
            StorageDriver::DigitalOcean => "do",
            StorageDriver::Gcs => "gcs",
            StorageDriver::Local => "local",
        }
    }
}

impl fmt::Display for StorageDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageDriver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(StorageDriver::S3),
            "do" => Ok(StorageDriver::DigitalOcean),
            "gcs" => Ok(StorageDriver::Gcs),
            "local" => Ok(StorageDriver::Local),
            other => Err(format!(
                "unknown storage driver '{}', expected one of: s3, do, gcs, local",
                other
            )),
        }
    }
}

/// Connection settings of a single disk, resolved from the environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskCredentials {
    pub key: String,
    pub secret: String,
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskConfig {
    pub driver: StorageDriver,
    pub config: DiskCredentials,
    /// Use `endpoint/bucket` URLs instead of `bucket.endpoint` (S3 drivers only)
    #[serde(skip)]
    pub path_style: bool,
}

/// Storage configuration: the default disk name plus every configured disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageManagerConfig {
    pub default: String,
    pub disks: HashMap<String, DiskConfig>,
}

/// Environment variables read for a disk, in validation order
pub const STORAGE_ENV_VARS: [&str; 5] = [
    "STORAGE_ACCESS_KEY",
    "STORAGE_SECRET_KEY",
    "STORAGE_ENDPOINT",
    "STORAGE_DEFAULT_BUCKET_NAME",
    "STORAGE_REGION",
];

impl StorageManagerConfig {
    /// Build the storage configuration from the process environment
    pub fn from_env(driver: Option<StorageDriver>) -> Result<Self, ConfigError> {
        Self::from_lookup(driver, |name| env::var(name).ok())
    }

    /// Build the storage configuration from an arbitrary variable source
    ///
    /// Exactly one disk is configured, keyed by the selected driver name
    /// (`s3` when `driver` is `None`). Every one of [`STORAGE_ENV_VARS`]
    /// must be set to a non-empty value.
    pub fn from_lookup<F>(driver: Option<StorageDriver>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let driver = driver.unwrap_or_default();
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let config = DiskCredentials {
            key: required("STORAGE_ACCESS_KEY")?,
            secret: required("STORAGE_SECRET_KEY")?,
            endpoint: required("STORAGE_ENDPOINT")?,
            bucket: required("STORAGE_DEFAULT_BUCKET_NAME")?,
            region: required("STORAGE_REGION")?,
        };

        let path_style = parse_bool("STORAGE_PATH_STYLE", lookup("STORAGE_PATH_STYLE"), false)?;

        let name = driver.as_str().to_string();
        let mut disks = HashMap::new();
        disks.insert(
            name.clone(),
            DiskConfig {
                driver,
                config,
                path_style,
            },
        );

        Ok(Self {
            default: name,
            disks,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        let driver = match env::var("STORAGE_DRIVER").ok().filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<StorageDriver>().map_err(|reason| {
                ConfigError::Invalid {
                    var: "STORAGE_DRIVER",
                    reason,
                }
            })?),
            None => None,
        };

        Ok(Config {
            app: AppConfig::from_env()?,
            storage: StorageManagerConfig::from_env(driver)?,
            database: DatabaseOptions::from_env()?,
            swagger: SwaggerConfig::from_env(),
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_number("PORT", env::var("PORT").ok(), 3000u16)?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = parse_number(
            "MAX_REQUEST_BODY_SIZE",
            env::var("MAX_REQUEST_BODY_SIZE").ok(),
            Self::DEFAULT_MAX_REQUEST_BODY_SIZE,
        )?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseOptions {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = parse_bool(
            "STORAGE_DATABASE_ENABLED",
            lookup("STORAGE_DATABASE_ENABLED"),
            true,
        )?;

        let connection = if enabled {
            Some(DatabaseConfig::from_lookup(&lookup)?)
        } else {
            None
        };

        Ok(Self {
            enabled,
            connection,
        })
    }
}

impl DatabaseConfig {
    const DEFAULT_NAME: &'static str = "storage";
    const DEFAULT_TABLE: &'static str = "files";

    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|s| !s.is_empty());

        // STORAGE_MONGODB_* are accepted for deployments configured before the rename
        let url = non_empty("STORAGE_DATABASE_URL")
            .or_else(|| non_empty("STORAGE_MONGODB_URL"))
            .ok_or(ConfigError::Missing("STORAGE_DATABASE_URL"))?;

        let name = non_empty("STORAGE_DATABASE_NAME")
            .or_else(|| non_empty("STORAGE_MONGODB_NAME"))
            .unwrap_or_else(|| Self::DEFAULT_NAME.to_string());

        let table = non_empty("STORAGE_DATABASE_TABLE")
            .unwrap_or_else(|| Self::DEFAULT_TABLE.to_string());
        if !IDENTIFIER_REGEX.is_match(&table) {
            return Err(ConfigError::Invalid {
                var: "STORAGE_DATABASE_TABLE",
                reason: format!("'{}' is not a valid table name", table),
            });
        }

        Ok(Self {
            url,
            name,
            table,
            max_connections: parse_number(
                "DB_MAX_CONNECTIONS",
                lookup("DB_MAX_CONNECTIONS"),
                Self::DEFAULT_MAX_CONNECTIONS,
            )?,
            min_connections: parse_number(
                "DB_MIN_CONNECTIONS",
                lookup("DB_MIN_CONNECTIONS"),
                Self::DEFAULT_MIN_CONNECTIONS,
            )?,
            acquire_timeout_secs: parse_number(
                "DB_ACQUIRE_TIMEOUT_SECS",
                lookup("DB_ACQUIRE_TIMEOUT_SECS"),
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_number(
                "DB_IDLE_TIMEOUT_SECS",
                lookup("DB_IDLE_TIMEOUT_SECS"),
                Self::DEFAULT_IDLE_TIMEOUT_SECS,
            )?,
            max_lifetime_secs: parse_number(
                "DB_MAX_LIFETIME_SECS",
                lookup("DB_MAX_LIFETIME_SECS"),
                Self::DEFAULT_MAX_LIFETIME_SECS,
            )?,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Self {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Storage API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "File upload and metadata API".to_string());

        Self {
            username,
            password,
            title,
            version,
            description,
        }
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

fn parse_number<T: FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw.filter(|s| !s.is_empty()) {
        Some(value) => value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            var,
            reason: format!("'{}' must be a valid number", value),
        }),
        None => Ok(default),
    }
}

fn parse_bool(var: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw.filter(|s| !s.is_empty()) {
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                var,
                reason: format!("'{}' must be a boolean", value),
            }),
        },
        None => Ok(default),
    }
}
