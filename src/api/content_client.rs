// src/api/content_client.rs
//! The operations the sync needs from the content source, with its
//! failure semantics applied on top of the raw repository.

use super::pagination::{fetch_all_pages, FailurePolicy};
use super::NotionRepository;
use crate::constants::{DEFAULT_STATUS_PROPERTY, NOTION_API_PAGE_SIZE};
use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::{BlockId, DatabaseId, PageId, PropertyName};
use std::sync::Arc;

/// Fail-open access to the content source.
///
/// Only an authorization failure on the database listing is reported to
/// the caller; every other remote failure shrinks the result instead.
#[derive(Clone)]
pub struct ContentClient {
    repository: Arc<dyn NotionRepository>,
    status_property: PropertyName,
}

impl ContentClient {
    pub fn new(repository: Arc<dyn NotionRepository>) -> Self {
        Self {
            repository,
            status_property: PropertyName::from(DEFAULT_STATUS_PROPERTY),
        }
    }

    pub fn with_status_property(mut self, property: PropertyName) -> Self {
        self.status_property = property;
        self
    }

    /// Every row of the database, in server order.
    ///
    /// A failed page fetch truncates the listing. A 401 is returned as an
    /// error because no later call can succeed with the same key.
    pub async fn list_child_pages(&self, database: &DatabaseId) -> Result<Vec<Page>, AppError> {
        let result = fetch_all_pages(
            |cursor| self.repository.query_database(database, cursor),
            FailurePolicy::TruncateUnless(AppError::is_unauthorized),
        )
        .await?;

        if result.truncated {
            log::warn!(
                "Listing of database {} truncated after {} pages ({} rows)",
                database,
                result.pages_fetched,
                result.items.len()
            );
        }
        log::debug!("Database {} listed {} rows", database, result.items.len());
        Ok(result.items)
    }

    /// Children of a block (or the top-level blocks of a page), in order.
    ///
    /// Empty when the first page fails; truncated when a later one does.
    pub async fn fetch_block_children(&self, parent: &BlockId) -> Vec<Block> {
        let outcome = fetch_all_pages(
            |cursor| {
                self.repository
                    .block_children(parent, NOTION_API_PAGE_SIZE, cursor)
            },
            FailurePolicy::Truncate,
        )
        .await;

        match outcome {
            Ok(result) => {
                if result.truncated {
                    log::warn!(
                        "Children of {} truncated to {} blocks",
                        parent,
                        result.items.len()
                    );
                }
                result.items
            }
            // Unreachable with FailurePolicy::Truncate, kept total.
            Err(e) => {
                log::error!("Could not fetch children of {}: {}", parent, e);
                Vec::new()
            }
        }
    }

    /// Best-effort update of the page's status property.
    ///
    /// Returns whether the update was accepted; failures are only logged.
    pub async fn set_page_status(&self, page: &PageId, status: &str) -> bool {
        let mut properties = serde_json::Map::new();
        properties.insert(
            self.status_property.to_string(),
            serde_json::json!({ "status": { "name": status } }),
        );
        let properties = serde_json::Value::Object(properties);

        match self
            .repository
            .update_page_properties(page, &properties)
            .await
        {
            Ok(()) => {
                log::info!("Page {} status set to '{}'", page, status);
                true
            }
            Err(e) => {
                log::warn!("Could not set status of page {} to '{}': {}", page, status, e);
                false
            }
        }
    }
}
