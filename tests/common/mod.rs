// tests/common/mod.rs
//! In-process fakes for the content source, media downloads and the bucket.

#![allow(dead_code)]

use notion_post_sync::{
    AppError, AssetFetcher, Block, BlockId, BucketName, DatabaseId, MemoryObjectStore,
    NotionErrorCode, ObjectStore, Page, PageId, PaginatedResponse, PropertyValue, RichTextItem,
    UniqueIdData,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

pub const DATABASE: &str = "0000000000000000000000000000d00d";
pub const AUTH_TOKEN: &str = "test-auth-token";

pub fn database_id() -> DatabaseId {
    DatabaseId::parse(DATABASE).unwrap()
}

/// Remote failure carrying `status`, the way the HTTP client reports it.
pub fn remote_error(status: u16) -> AppError {
    AppError::NotionService {
        code: NotionErrorCode::from_http_status(status),
        message: format!("status {}", status),
        status: reqwest::StatusCode::from_u16(status).unwrap(),
    }
}

/// A post row with a title, numeric `ID` and optional category.
pub fn post(hex_id: &str, number: i64, title: &str, category: Option<&str>) -> Page {
    let mut page = Page::new(PageId::parse(hex_id).unwrap())
        .with_property("Name", PropertyValue::Title(vec![RichTextItem::plain_text(title)]))
        .with_property("ID", PropertyValue::UniqueId(Some(UniqueIdData::number(number))));
    if let Some(category) = category {
        page = page.with_property("category", PropertyValue::Select(Some(category.to_string())));
    }
    page
}

/// A content source served from memory.
///
/// Database rows come in pre-split API pages. Block children are served
/// `children_chunk` at a time. Every call is recorded.
pub struct FakeRepository {
    listing: Vec<Vec<Page>>,
    listing_failures: HashMap<usize, u16>,
    children: HashMap<String, Vec<Block>>,
    children_chunk: usize,
    update_failure: Option<u16>,
    calls: Mutex<Vec<String>>,
    updates: Mutex<Vec<(String, serde_json::Value)>>,
}

impl Default for FakeRepository {
    fn default() -> Self {
        Self {
            listing: Vec::new(),
            listing_failures: HashMap::new(),
            children: HashMap::new(),
            children_chunk: 100,
            update_failure: None,
            calls: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one API page of database rows.
    pub fn with_listing_page(mut self, pages: Vec<Page>) -> Self {
        self.listing.push(pages);
        self
    }

    /// Makes the fetch of listing page `index` (zero-based) fail with `status`.
    pub fn failing_listing_page(mut self, index: usize, status: u16) -> Self {
        self.listing_failures.insert(index, status);
        self
    }

    pub fn with_children(mut self, parent: &str, blocks: Vec<Block>) -> Self {
        self.children.insert(parent.to_string(), blocks);
        self
    }

    pub fn with_children_chunk(mut self, chunk: usize) -> Self {
        self.children_chunk = chunk;
        self
    }

    pub fn failing_updates(mut self, status: u16) -> Self {
        self.update_failure = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// `(page id, properties)` of every accepted status patch.
    pub fn updates(&self) -> Vec<(String, serde_json::Value)> {
        self.updates.lock().clone()
    }

    /// Status names patched onto `page`, in order.
    pub fn statuses_of(&self, page: &str) -> Vec<String> {
        self.updates()
            .into_iter()
            .filter(|(id, _)| id == page)
            .filter_map(|(_, properties)| {
                properties
                    .pointer("/status/status/name")
                    .and_then(|name| name.as_str())
                    .map(str::to_string)
            })
            .collect()
    }
}

fn page_index(cursor: Option<String>) -> usize {
    cursor
        .and_then(|c| c.strip_prefix("cursor-").and_then(|n| n.parse().ok()))
        .unwrap_or(0)
}

#[async_trait::async_trait]
impl notion_post_sync::NotionRepository for FakeRepository {
    async fn query_database(
        &self,
        database: &DatabaseId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Page>, AppError> {
        let index = page_index(cursor);
        self.calls
            .lock()
            .push(format!("query:{}:{}", database.as_str(), index));

        if let Some(status) = self.listing_failures.get(&index) {
            return Err(remote_error(*status));
        }

        let results = self.listing.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < self.listing.len()).then(|| format!("cursor-{}", index + 1));
        Ok(PaginatedResponse::new(results, next))
    }

    async fn block_children(
        &self,
        parent: &BlockId,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        let offset = page_index(cursor);
        self.calls
            .lock()
            .push(format!("children:{}:{}", parent.as_str(), offset));

        let all = self.children.get(parent.as_str()).cloned().unwrap_or_default();
        let size = self.children_chunk.min(page_size as usize).max(1);
        let end = (offset + size).min(all.len());
        let results = all.get(offset..end).map(<[Block]>::to_vec).unwrap_or_default();
        let next = (end < all.len()).then(|| format!("cursor-{}", end));
        Ok(PaginatedResponse::new(results, next))
    }

    async fn update_page_properties(
        &self,
        page: &PageId,
        properties: &serde_json::Value,
    ) -> Result<(), AppError> {
        self.calls.lock().push(format!("update:{}", page.as_str()));
        if let Some(status) = self.update_failure {
            return Err(remote_error(status));
        }
        self.updates
            .lock()
            .push((page.as_str().to_string(), properties.clone()));
        Ok(())
    }
}

/// Writes the URL into a file named after its last segment (suffixed when
/// the name is taken), or fails for URLs containing `broken`.
#[derive(Default)]
pub struct StubFetcher {
    fetched: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().clone()
    }
}

#[async_trait::async_trait]
impl AssetFetcher for StubFetcher {
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, AppError> {
        self.fetched.lock().push(url.to_string());
        if url.contains("broken") {
            return Err(AppError::AssetDownload {
                url: url.to_string(),
                reason: "HTTP 500".to_string(),
            });
        }
        let file_name = notion_post_sync::asset_file_name(url);
        let (path, mut file) = notion_post_sync::create_unique_file(dest_dir, &file_name).await?;
        file.write_all(url.as_bytes()).await?;
        Ok(path)
    }
}

/// Which bucket operations a [`FlakyStore`] refuses.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreFailures {
    pub puts: bool,
    pub lists: bool,
    pub deletes: bool,
}

/// An in-memory bucket whose writes, listings or deletes can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryObjectStore,
    failures: StoreFailures,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failures: StoreFailures) -> Self {
        Self {
            inner: MemoryObjectStore::new(),
            failures,
        }
    }

    pub fn keys(&self, bucket: &BucketName) -> Vec<String> {
        self.inner.keys(bucket)
    }

    pub fn get(&self, bucket: &BucketName, key: &str) -> Option<Vec<u8>> {
        self.inner.get(bucket, key)
    }

    /// Writes straight into the bucket, bypassing any configured failure.
    pub async fn seed(&self, bucket: &BucketName, key: &str, bytes: &[u8]) {
        self.inner
            .put_object(bucket, key, bytes.to_vec())
            .await
            .unwrap();
    }
}

#[async_trait::async_trait]
impl ObjectStore for FlakyStore {
    async fn put_object(
        &self,
        bucket: &BucketName,
        key: &str,
        bytes: Vec<u8>,
    ) -> Result<(), AppError> {
        if self.failures.puts {
            return Err(AppError::storage(key, "write refused"));
        }
        self.inner.put_object(bucket, key, bytes).await
    }

    async fn list_objects(
        &self,
        bucket: &BucketName,
        prefix: &str,
    ) -> Result<Vec<String>, AppError> {
        if self.failures.lists {
            return Err(AppError::storage(prefix, "listing refused"));
        }
        self.inner.list_objects(bucket, prefix).await
    }

    async fn delete_objects(&self, bucket: &BucketName, keys: &[String]) -> Result<(), AppError> {
        if self.failures.deletes {
            return Err(AppError::storage(keys.join(","), "delete refused"));
        }
        self.inner.delete_objects(bucket, keys).await
    }
}
