//! Image storage for post attachments
//!
//! Uploads are written once and never read back through the service; the
//! returned URL is stored on the post and served by the CDN.

pub mod s3;

pub use s3::S3ImageStore;

use crate::error::{AppError, Result};
use async_trait::async_trait;

/// Extensions accepted for post images
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `body` and return its public URL
    async fn upload(&self, body: Vec<u8>, extension: &str) -> Result<String>;
}

/// Lower-cased extension of `filename`, rejected unless it is a supported image type
pub fn image_extension(filename: &str) -> Result<String> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| AppError::BadRequest("File type is not supported".to_string()))?;
    Ok(extension)
}

/// Content type for a validated extension
pub fn content_type(extension: &str) -> mime::Mime {
    match extension {
        "png" => mime::IMAGE_PNG,
        _ => mime::IMAGE_JPEG,
    }
}
