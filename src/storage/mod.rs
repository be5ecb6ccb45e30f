// src/storage/mod.rs
//! Durable publication of rendered documents into an object store.
//!
//! Every document owns one key prefix, `posts/{category}/{document_id}/`;
//! publishing writes under it and unpublishing removes all of it.

mod local;
mod memory;
mod publisher;

pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;
pub use publisher::{PublishReport, Publisher};

use crate::constants::{DOCUMENT_FILE_NAME, POSTS_KEY_ROOT};
use crate::error::AppError;
use crate::types::{BucketName, ValidationError};

/// A flat key/value blob store addressed by bucket and `/`-separated key.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `bytes` at `key`, replacing any existing object.
    async fn put_object(&self, bucket: &BucketName, key: &str, bytes: Vec<u8>)
        -> Result<(), AppError>;

    /// Keys of every object whose key starts with `prefix`, sorted.
    async fn list_objects(&self, bucket: &BucketName, prefix: &str)
        -> Result<Vec<String>, AppError>;

    /// Deletes all `keys` in one call; keys that do not exist are ignored.
    async fn delete_objects(&self, bucket: &BucketName, keys: &[String]) -> Result<(), AppError>;
}

/// `posts/{category}/{document_id}/`
pub fn document_prefix(category: &str, document_id: &str) -> String {
    format!("{}/{}/{}/", POSTS_KEY_ROOT, category, document_id)
}

/// Key of the document text itself.
pub fn document_key(category: &str, document_id: &str) -> String {
    format!("{}{}", document_prefix(category, document_id), DOCUMENT_FILE_NAME)
}

/// Rejects keys that are empty, absolute, or step outside their bucket.
pub(crate) fn validate_key(key: &str) -> Result<(), ValidationError> {
    let reason = if key.is_empty() {
        Some("key is empty")
    } else if key.starts_with('/') {
        Some("key must be relative")
    } else if key.split('/').any(|segment| segment == ".." || segment == ".") {
        Some("key contains a relative path segment")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ValidationError::InvalidStorageKey {
            key: key.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_layout() {
        assert_eq!(document_prefix("web", "42"), "posts/web/42/");
        assert_eq!(document_key("web", "42"), "posts/web/42/page.mdx");
    }

    #[test]
    fn key_validation() {
        assert!(validate_key("posts/web/42/page.mdx").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("posts/../../escape").is_err());
    }
}
