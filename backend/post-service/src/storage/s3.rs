/// S3 image store
use super::{content_type, ImageStore};
use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use uuid::Uuid;

#[derive(Clone)]
pub struct S3ImageStore {
    client: Client,
    bucket: String,
    prefix: String,
    cdn_base_url: String,
}

impl S3ImageStore {
    pub fn new(client: Client, config: &StorageConfig) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            prefix: config.prefix.trim_matches('/').to_string(),
            cdn_base_url: config.cdn_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a client from the ambient AWS environment
    pub async fn from_env(config: &StorageConfig) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        Self::new(Client::new(&aws_config), config)
    }

    fn object_key(&self, extension: &str) -> String {
        format!("{}/{}.{}", self.prefix, Uuid::new_v4(), extension)
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.cdn_base_url, key)
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn upload(&self, body: Vec<u8>, extension: &str) -> Result<String> {
        let key = self.object_key(extension);
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type(extension).essence_str())
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("put_object {}: {}", key, e)))?;

        tracing::debug!(key = %key, size, "uploaded post image");
        Ok(self.public_url(&key))
    }
}
