/// Configuration management for Post Service
///
/// Loads configuration from environment variables (a `.env` file is honoured
/// by `main` before this runs).
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration; `None` selects the in-memory store
    pub database: Option<DatabaseConfig>,
    /// Token settings
    pub auth: AuthConfig,
    /// Image upload settings; `None` disables image uploads
    pub storage: Option<StorageConfig>,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub http_port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Min connections in pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Token settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Access token lifetime in days
    pub token_ttl_days: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_days", &self.token_ttl_days)
            .finish()
    }
}

/// S3-compatible image storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Key prefix for uploaded images
    pub prefix: String,
    /// Public base URL images are served from; defaults to the bucket URL
    pub cdn_base_url: String,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

// Default values
fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

const DEFAULT_HTTP_PORT: u16 = 8000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_HTTP_PORT),
        };

        let database = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: std::env::var("DB_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: std::env::var("DB_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            });

        let auth = AuthConfig {
            jwt_secret: std::env::var("JWT_SECRET")
                .context("JWT_SECRET environment variable not set")?,
            token_ttl_days: std::env::var("JWT_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(crypto_core::jwt::DEFAULT_TOKEN_TTL_DAYS),
        };

        let storage = match std::env::var("S3_BUCKET").ok().filter(|b| !b.is_empty()) {
            Some(bucket) => {
                let region =
                    std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());
                let cdn_base_url = std::env::var("CDN_BASE_URL")
                    .unwrap_or_else(|_| format!("https://{}.s3.{}.amazonaws.com", bucket, region));
                Some(StorageConfig {
                    prefix: std::env::var("S3_PREFIX")
                        .unwrap_or_else(|_| "post-images".to_string()),
                    max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
                    bucket,
                    region,
                    cdn_base_url,
                })
            }
            None => None,
        };

        Ok(Config {
            app,
            database,
            auth,
            storage,
        })
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.app.host, self.app.http_port)
    }
}
