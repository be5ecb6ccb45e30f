// src/handler/sync.rs
//! The request state machine: authenticate, select, then publish or remove.

use super::request::{parse_selector, HandlerResponse, InboundRequest, Operation};
use crate::api::ContentClient;
use crate::assets::{AssetFetcher, StagingArea};
use crate::constants::{STATUS_NOT_UPLOADED, STATUS_UPLOADED};
use crate::error::{AppError, RequestError};
use crate::formatting::{render_document, DocumentSources};
use crate::model::{Page, PostMetadata};
use crate::storage::Publisher;
use crate::types::{AuthToken, DatabaseId};
use std::sync::Arc;

/// Everything one request needs, shared by every request.
///
/// Uploads and deletes run one at a time: they share the staging area,
/// and one request clearing a document's staged files must not pull them
/// out from under another.
pub struct PostSync {
    content: ContentClient,
    assets: Arc<dyn AssetFetcher>,
    publisher: Publisher,
    staging: StagingArea,
    database: DatabaseId,
    auth_token: AuthToken,
    run_lock: tokio::sync::Mutex<()>,
}

impl PostSync {
    pub fn new(
        content: ContentClient,
        assets: Arc<dyn AssetFetcher>,
        publisher: Publisher,
        staging: StagingArea,
        database: DatabaseId,
        auth_token: AuthToken,
    ) -> Self {
        Self {
            content,
            assets,
            publisher,
            staging,
            database,
            auth_token,
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Runs one request to completion. Never fails; every outcome is a
    /// response.
    pub async fn handle(&self, request: InboundRequest) -> HandlerResponse {
        match self.dispatch(&request).await {
            Ok(message) => HandlerResponse::ok(message),
            Err(e) => {
                log::warn!("{:?} request failed: {}", request.operation, e);
                HandlerResponse::from(e)
            }
        }
    }

    async fn dispatch(&self, request: &InboundRequest) -> Result<String, RequestError> {
        // No remote call happens before the caller is authenticated.
        let authorized = request
            .header("authorization")
            .is_some_and(|presented| self.auth_token.matches(presented));
        if !authorized {
            return Err(RequestError::Unauthorized);
        }

        let selector = parse_selector(&request.body)?;
        match request.operation {
            Operation::Upload => self.upload(selector).await,
            Operation::Delete => {
                let id = selector
                    .ok_or_else(|| RequestError::BadRequest("Missing ID in body".to_string()))?;
                self.delete(id).await
            }
        }
    }

    /// Publishes the post with `selector`, or every post when `None`.
    ///
    /// A sweep reports success once it completes; per-post failures are
    /// only logged.
    pub async fn upload(&self, selector: Option<i64>) -> Result<String, RequestError> {
        let _running = self.run_lock.lock().await;
        let pages = self.list_pages().await?;

        match selector {
            Some(id) => {
                let page = select_page(&pages, id)?;
                self.upload_page(page).await;
            }
            None => {
                log::info!("Uploading all {} posts", pages.len());
                for page in &pages {
                    if page.archived {
                        log::debug!("Skipping archived post {}", page.id);
                        continue;
                    }
                    self.upload_page(page).await;
                }
            }
        }
        Ok("Upload Successful".to_string())
    }

    /// Removes every published object of the post with `selector`.
    pub async fn delete(&self, selector: i64) -> Result<String, RequestError> {
        let _running = self.run_lock.lock().await;
        let pages = self.list_pages().await?;
        let page = select_page(&pages, selector)?;

        let metadata = PostMetadata::from_page(page);
        let document_id = metadata.document_id(page);

        if let Err(e) = self
            .publisher
            .unpublish(&metadata.category, &document_id)
            .await
        {
            log::error!("Failed to delete post {}: {}", document_id, e);
            return Err(RequestError::Internal("Delete failed".to_string()));
        }

        self.content
            .set_page_status(&page.id, STATUS_NOT_UPLOADED)
            .await;
        Ok("Delete Successful".to_string())
    }

    async fn list_pages(&self) -> Result<Vec<Page>, RequestError> {
        self.content
            .list_child_pages(&self.database)
            .await
            .map_err(|e| {
                log::error!("Listing posts failed: {}", e);
                if e.is_unauthorized() {
                    RequestError::Unauthorized
                } else {
                    RequestError::Internal(e.to_string())
                }
            })
    }

    /// Renders and republishes one post, then marks it uploaded.
    ///
    /// Publish failures are logged and the status update still runs.
    async fn upload_page(&self, page: &Page) {
        let metadata = PostMetadata::from_page(page);
        let document_id = metadata.document_id(page);
        log::info!(
            "Uploading '{}' as {}/{}",
            metadata.title,
            metadata.category,
            document_id
        );

        if let Err(e) = self.staging.clear(&document_id).await {
            log::warn!("Could not clear staged files of {}: {}", document_id, e);
        }

        let sources = DocumentSources {
            content: &self.content,
            assets: self.assets.as_ref(),
            staging: &self.staging,
        };
        let document = render_document(page, &metadata, &document_id, &sources).await;

        if let Err(e) = self.replace_published(&document, &metadata.category, &document_id).await {
            log::error!("Failed to publish {}: {}", document_id, e);
        }

        self.content.set_page_status(&page.id, STATUS_UPLOADED).await;
    }

    async fn replace_published(
        &self,
        document: &str,
        category: &str,
        document_id: &str,
    ) -> Result<(), AppError> {
        self.publisher.unpublish(category, document_id).await?;
        self.publisher
            .publish(document, category, document_id, &self.staging)
            .await?;
        Ok(())
    }
}

fn select_page(pages: &[Page], id: i64) -> Result<&Page, RequestError> {
    let wanted = id.to_string();
    pages
        .iter()
        .find(|page| PostMetadata::from_page(page).selector_id.as_deref() == Some(wanted.as_str()))
        .ok_or_else(|| RequestError::NotFound(format!("No post found with custom ID: {}", id)))
}
