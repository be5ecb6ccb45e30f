// src/storage/publisher.rs
//! Publish and unpublish whole documents under their key prefix.

use super::{document_key, document_prefix, ObjectStore};
use crate::assets::StagingArea;
use crate::error::AppError;
use crate::types::BucketName;
use std::sync::Arc;

/// What a publish wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Keys written, document first, then assets in path order.
    pub keys: Vec<String>,
    pub bytes_written: usize,
}

impl PublishReport {
    fn with_object(mut self, key: String, bytes: usize) -> Self {
        self.bytes_written += bytes;
        self.keys.push(key);
        self
    }
}

/// Writes documents and their staged assets to one bucket.
#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn ObjectStore>,
    bucket: BucketName,
}

impl Publisher {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: BucketName) -> Self {
        Self { store, bucket }
    }

    pub fn bucket(&self) -> &BucketName {
        &self.bucket
    }

    /// Writes `document` as `posts/{category}/{document_id}/page.mdx` and
    /// uploads every staged asset of the document under the same prefix,
    /// keeping relative sub-paths.
    ///
    /// Does not delete first; replace by calling [`Publisher::unpublish`]
    /// beforehand.
    pub async fn publish(
        &self,
        document: &str,
        category: &str,
        document_id: &str,
        staging: &StagingArea,
    ) -> Result<PublishReport, AppError> {
        let prefix = document_prefix(category, document_id);
        let key = document_key(category, document_id);

        self.store
            .put_object(&self.bucket, &key, document.as_bytes().to_vec())
            .await?;
        let mut report = PublishReport::default().with_object(key, document.len());

        for staged in staging.staged_files(document_id).await? {
            let bytes = tokio::fs::read(&staged.path).await?;
            let asset_key = format!("{}{}", prefix, staged.relative_path);
            let size = bytes.len();
            self.store.put_object(&self.bucket, &asset_key, bytes).await?;
            log::debug!("Uploaded asset {}", asset_key);
            report = report.with_object(asset_key, size);
        }

        log::info!(
            "Published {} objects ({} bytes) under {}/{}",
            report.keys.len(),
            report.bytes_written,
            self.bucket,
            prefix
        );
        Ok(report)
    }

    /// Deletes every object under `posts/{category}/{document_id}/` in one
    /// batch and returns how many there were. An empty prefix is not an
    /// error.
    pub async fn unpublish(&self, category: &str, document_id: &str) -> Result<usize, AppError> {
        let prefix = document_prefix(category, document_id);
        let keys = self.store.list_objects(&self.bucket, &prefix).await?;

        if keys.is_empty() {
            log::debug!("Nothing published under {}/{}", self.bucket, prefix);
            return Ok(0);
        }

        self.store.delete_objects(&self.bucket, &keys).await?;
        log::info!("Deleted {} objects under {}/{}", keys.len(), self.bucket, prefix);
        Ok(keys.len())
    }
}
