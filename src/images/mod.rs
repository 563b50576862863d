//! External image storage. Uploaded images are addressed by a public link; the
//! storage-side id of an image is recovered from that link for deletion.

mod s3;

pub use s3::S3ImageStorage;

use async_trait::async_trait;
use axum::body::Bytes;
use serde::Serialize;

use crate::error::StorageError;

/// Namespace per entity family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Directory {
    Tour,
    Event,
    University,
    User,
}

impl Directory {
    pub fn as_str(self) -> &'static str {
        match self {
            Directory::Tour => "tour",
            Directory::Event => "event",
            Directory::University => "university",
            Directory::User => "user",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Lowercased extension of the original file name, with the leading dot.
    pub fn extension(&self) -> String {
        self.file_name
            .as_deref()
            .and_then(|n| n.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default()
    }
}

#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Stores the image and returns its public link.
    async fn upload(&self, image: ImageUpload, directory: Directory) -> Result<String, StorageError>;

    async fn delete_by_id(&self, image_id: &str, directory: Directory) -> Result<(), StorageError>;

    /// Storage id of a previously returned link, if the link belongs to this storage.
    fn image_id(&self, link: &str, directory: Directory) -> Option<String>;
}

/// Used when no bucket is configured: every call fails with `NotConfigured`.
pub struct DisabledImageStorage;

#[async_trait]
impl ImageStorage for DisabledImageStorage {
    async fn upload(&self, _image: ImageUpload, _directory: Directory) -> Result<String, StorageError> {
        Err(StorageError::NotConfigured)
    }

    async fn delete_by_id(&self, _image_id: &str, _directory: Directory) -> Result<(), StorageError> {
        Err(StorageError::NotConfigured)
    }

    fn image_id(&self, link: &str, _directory: Directory) -> Option<String> {
        link.rsplit('/').next().filter(|s| !s.is_empty()).map(str::to_string)
    }
}
