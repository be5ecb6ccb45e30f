// src/api/mod.rs
//! Notion API interaction: listing database rows, walking block trees
//! and patching page status.
//!
//! `NotionRepository` is the raw, one-request-per-call seam; `ContentClient`
//! layers pagination and the fail-open policy on top of it.

pub mod client;
mod content_client;
pub mod notion_client_adapter;
pub mod parser;
mod pagination;
mod responses;

use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::{BlockId, DatabaseId, PageId};

/// One request against the content API per method.
///
/// Business logic depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// One page of database rows, starting at `cursor`.
    async fn query_database(
        &self,
        database: &DatabaseId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Page>, AppError>;

    /// One page of a block's children. A page ID names the page's root block.
    async fn block_children(
        &self,
        parent: &BlockId,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Block>, AppError>;

    /// Patches `properties` onto the page.
    async fn update_page_properties(
        &self,
        page: &PageId,
        properties: &serde_json::Value,
    ) -> Result<(), AppError>;
}

pub use client::{ApiResponse, NotionHttpClient};
pub use content_client::ContentClient;
pub use pagination::{fetch_all_pages, FailurePolicy};
pub use responses::{PaginatedResponse, PaginationResult};
