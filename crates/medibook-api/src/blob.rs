//! Blob store collaborator for avatar images.
//!
//! Image hosting is delegated behind this seam: handlers pass the raw
//! image reference supplied by the client (typically an inline `data:`
//! URL) to `upload` and store the hosted URL it returns. A previously
//! stored avatar is deleted only when `is_hosted` recognizes it as
//! living in this store, never when it is an inline image. A failed
//! delete surfaces to the caller instead of being dropped.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob store rejected upload: {0}")]
    Upload(String),

    #[error("blob store failed to delete: {0}")]
    Delete(String),
}

pub trait BlobStore: Send + Sync {
    /// Store an image and return its hosted URL.
    fn upload(&self, image: &str) -> Result<String, BlobError>;

    /// Remove a previously uploaded image. Deleting an unknown id is not
    /// an error.
    fn delete(&self, public_id: &str) -> Result<(), BlobError>;

    /// Whether `url` points into this store, as opposed to an inline
    /// `data:` image or a foreign host.
    fn is_hosted(&self, url: &str) -> bool;
}

/// Extract the public id from a hosted URL: the last path segment minus
/// its extension.
pub fn public_id(url: &str) -> Option<&str> {
    url.rsplit('/').next()?.split('.').next()
}

/// In-process store used in development and tests. Keeps uploads in
/// memory and hands out stable fake URLs under a fixed prefix.
pub struct DevBlobStore {
    prefix: String,
    blobs: Mutex<HashMap<String, String>>,
}

impl DevBlobStore {
    pub fn new() -> Self {
        Self {
            prefix: "https://blobs.medibook.dev/".to_owned(),
            blobs: Mutex::new(HashMap::new()),
        }
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.lock().contains_key(public_id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DevBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for DevBlobStore {
    fn upload(&self, image: &str) -> Result<String, BlobError> {
        if image.is_empty() {
            return Err(BlobError::Upload("empty image".to_owned()));
        }
        let id = Uuid::new_v4().simple().to_string();
        self.lock().insert(id.clone(), image.to_owned());
        Ok(format!("{}{}.png", self.prefix, id))
    }

    fn delete(&self, public_id: &str) -> Result<(), BlobError> {
        self.lock().remove(public_id);
        Ok(())
    }

    fn is_hosted(&self, url: &str) -> bool {
        url.starts_with(&self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_then_delete() {
        let store = DevBlobStore::new();
        let url = store.upload("data:image/png;base64,AAAA").unwrap();
        assert!(store.is_hosted(&url));

        let id = public_id(&url).unwrap();
        assert!(store.contains(id));
        store.delete(id).unwrap();
        assert!(!store.contains(id));
    }

    #[test]
    fn test_inline_images_are_not_hosted() {
        let store = DevBlobStore::new();
        assert!(!store.is_hosted("data:image/png;base64,AAAA"));
        assert!(!store.is_hosted("https://elsewhere.example/x.png"));
    }

    #[test]
    fn test_public_id_extraction() {
        assert_eq!(
            public_id("https://blobs.medibook.dev/abc123.png"),
            Some("abc123")
        );
        assert_eq!(public_id("abc123.png"), Some("abc123"));
    }

    #[test]
    fn test_empty_upload_rejected() {
        let store = DevBlobStore::new();
        assert!(store.upload("").is_err());
    }
}
