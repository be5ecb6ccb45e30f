// src/storage/memory.rs
//! In-process object store.

use super::{validate_key, ObjectStore};
use crate::error::AppError;
use crate::types::BucketName;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Keeps objects in memory, keyed by `(bucket, key)`.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of one object, if present.
    pub fn get(&self, bucket: &BucketName, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .get(&(bucket.as_str().to_string(), key.to_string()))
            .cloned()
    }

    /// Every key in `bucket`, sorted.
    pub fn keys(&self, bucket: &BucketName) -> Vec<String> {
        self.objects
            .lock()
            .keys()
            .filter(|(b, _)| b == bucket.as_str())
            .map(|(_, key)| key.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        bucket: &BucketName,
        key: &str,
        bytes: Vec<u8>,
    ) -> Result<(), AppError> {
        validate_key(key)?;
        self.objects
            .lock()
            .insert((bucket.as_str().to_string(), key.to_string()), bytes);
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &BucketName,
        prefix: &str,
    ) -> Result<Vec<String>, AppError> {
        Ok(self
            .keys(bucket)
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }

    async fn delete_objects(&self, bucket: &BucketName, keys: &[String]) -> Result<(), AppError> {
        let mut objects = self.objects.lock();
        for key in keys {
            objects.remove(&(bucket.as_str().to_string(), key.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn buckets_are_isolated() {
        let store = MemoryObjectStore::new();
        let posts = BucketName::new("posts-bucket").unwrap();
        let other = BucketName::new("other").unwrap();

        store.put_object(&posts, "posts/web/1/page.mdx", b"a".to_vec()).await.unwrap();
        store.put_object(&other, "posts/web/1/page.mdx", b"b".to_vec()).await.unwrap();
        store
            .delete_objects(&posts, &["posts/web/1/page.mdx".to_string()])
            .await
            .unwrap();

        assert!(store.keys(&posts).is_empty());
        assert_eq!(store.get(&other, "posts/web/1/page.mdx"), Some(b"b".to_vec()));
    }
}
