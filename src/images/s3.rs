use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::{Directory, ImageStorage, ImageUpload};
use crate::error::StorageError;

/// Objects live under `{directory}/{uuid}{ext}` and are linked as `{public_url}/{key}`.
pub struct S3ImageStorage {
    client: Client,
    bucket: String,
    public_url: String,
}

impl S3ImageStorage {
    pub fn new(client: Client, bucket: impl Into<String>, public_url: impl Into<String>) -> Self {
        S3ImageStorage {
            client,
            bucket: bucket.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client from the default AWS credential/region chain.
    pub async fn from_env(bucket: impl Into<String>, public_url: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), bucket, public_url)
    }

    fn key(directory: Directory, image_id: &str) -> String {
        format!("{}/{}", directory.as_str(), image_id)
    }
}

#[async_trait]
impl ImageStorage for S3ImageStorage {
    async fn upload(&self, image: ImageUpload, directory: Directory) -> Result<String, StorageError> {
        let image_id = format!("{}{}", uuid::Uuid::new_v4(), image.extension());
        let key = Self::key(directory, &image_id);
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(image.bytes));
        if let Some(content_type) = image.content_type {
            request = request.content_type(content_type);
        }
        request
            .send()
            .await
            .map_err(|e| StorageError::Upload(DisplayErrorContext(&e).to_string()))?;
        tracing::debug!(bucket = %self.bucket, key = %key, "image uploaded");
        Ok(format!("{}/{}", self.public_url, key))
    }

    async fn delete_by_id(&self, image_id: &str, directory: Directory) -> Result<(), StorageError> {
        let key = Self::key(directory, image_id);
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| StorageError::Delete(DisplayErrorContext(&e).to_string()))?;
        tracing::debug!(bucket = %self.bucket, key = %key, "image deleted");
        Ok(())
    }

    fn image_id(&self, link: &str, directory: Directory) -> Option<String> {
        let prefix = format!("{}/{}/", self.public_url, directory.as_str());
        link.strip_prefix(&prefix)
            .filter(|id| !id.is_empty() && !id.contains('/'))
            .map(str::to_string)
    }
}
