// src/storage/local.rs
//! Directory-backed object store: `<root>/<bucket>/<key>`.

use super::{validate_key, ObjectStore};
use crate::error::AppError;
use crate::types::BucketName;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: &BucketName) -> PathBuf {
        self.root.join(bucket.as_str())
    }

    fn object_path(&self, bucket: &BucketName, key: &str) -> Result<PathBuf, AppError> {
        validate_key(key)?;
        Ok(key
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.bucket_dir(bucket), |path, segment| path.join(segment)))
    }

    /// Removes directories left empty by a delete, stopping at the bucket.
    async fn prune_empty_dirs(&self, bucket_dir: &Path, start: Option<&Path>) {
        let mut current = start.map(Path::to_path_buf);
        while let Some(dir) = current {
            if dir == bucket_dir || !dir.starts_with(bucket_dir) {
                break;
            }
            if tokio::fs::remove_dir(&dir).await.is_err() {
                break;
            }
            current = dir.parent().map(Path::to_path_buf);
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put_object(
        &self,
        bucket: &BucketName,
        key: &str,
        bytes: Vec<u8>,
    ) -> Result<(), AppError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::storage(key, e))?;
        }
        log::debug!("Writing {} bytes to {}", bytes.len(), path.display());
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::storage(key, e))
    }

    async fn list_objects(
        &self,
        bucket: &BucketName,
        prefix: &str,
    ) -> Result<Vec<String>, AppError> {
        let base = self.bucket_dir(bucket);
        let mut keys = Vec::new();
        let mut pending = vec![base.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(AppError::storage(prefix, e)),
            };
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| AppError::storage(prefix, e))?
            {
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| AppError::storage(prefix, e))?;
                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Ok(relative) = path.strip_prefix(&base) else {
                    continue;
                };
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn delete_objects(&self, bucket: &BucketName, keys: &[String]) -> Result<(), AppError> {
        let bucket_dir = self.bucket_dir(bucket);
        for key in keys {
            let path = self.object_path(bucket, key)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(AppError::storage(key.as_str(), e)),
            }
            self.prune_empty_dirs(&bucket_dir, path.parent()).await;
        }
        Ok(())
    }
}
