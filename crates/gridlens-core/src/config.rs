//! Configuration module
//!
//! Explicit configuration structure built once from the environment and
//! passed into pipeline construction. Nothing reads the environment at
//! request time.

use std::env;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3600;
const DEFAULT_POST_COMMIT_TIMEOUT_SECS: u64 = 5;

/// Policy for the `fileName` reported back to the caller.
///
/// The object storage key stem is always the generated record id; this
/// policy only governs the display name in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilenamePolicy {
    /// Report the generated record id as the file name.
    #[default]
    Generated,
    /// Report the sanitized client-supplied name, falling back to the
    /// record id when the sanitized name is empty.
    Client,
}

impl FromStr for FilenamePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generated" => Ok(FilenamePolicy::Generated),
            "client" => Ok(FilenamePolicy::Client),
            other => Err(format!(
                "Invalid FILENAME_POLICY '{}'. Must be 'generated' or 'client'",
                other
            )),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    // Document store
    pub database_url: String,
    pub db_max_connections: u32,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Notification queue
    pub queue_url: String,
    pub queue_endpoint: Option<String>, // Custom endpoint (LocalStack)
    // Upload behavior
    pub max_file_size_bytes: usize,
    pub signed_url_ttl_secs: u64,
    pub post_commit_timeout_secs: u64,
    pub filename_policy: FilenamePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let storage_backend = match env_opt("STORAGE_BACKEND") {
            Some(value) => Some(value.parse::<StorageBackend>()?),
            None => None,
        };

        let filename_policy = match env_opt("FILENAME_POLICY") {
            Some(value) => value
                .parse::<FilenamePolicy>()
                .map_err(|e| anyhow::anyhow!(e))?,
            None => FilenamePolicy::default(),
        };

        Ok(Config {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT),
            environment: env_string("ENVIRONMENT", "development"),
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            storage_backend,
            s3_bucket: env_opt("S3_BUCKET"),
            s3_region: env_opt("S3_REGION"),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            aws_region: env_opt("AWS_REGION"),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            queue_url: env::var("QUEUE_URL")
                .map_err(|_| anyhow::anyhow!("QUEUE_URL must be set"))?,
            queue_endpoint: env_opt("QUEUE_ENDPOINT"),
            max_file_size_bytes: env_parse("MAX_FILE_SIZE_BYTES", DEFAULT_MAX_FILE_SIZE_BYTES),
            signed_url_ttl_secs: env_parse("SIGNED_URL_TTL_SECS", DEFAULT_SIGNED_URL_TTL_SECS),
            post_commit_timeout_secs: env_parse(
                "POST_COMMIT_TIMEOUT_SECS",
                DEFAULT_POST_COMMIT_TIMEOUT_SECS,
            ),
            filename_policy,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
