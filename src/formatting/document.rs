// src/formatting/document.rs
//! Assembly of one complete document: front matter, thumbnail, body.

use super::block_renderer::DocumentRenderer;
use super::front_matter::render_front_matter;
use super::state::RenderState;
use crate::api::ContentClient;
use crate::assets::{stage_thumbnail, AssetFetcher, StagingArea};
use crate::error::AppError;
use crate::model::{Page, PostMetadata};

/// Where a document's blocks and media come from.
pub struct DocumentSources<'a> {
    pub content: &'a ContentClient,
    pub assets: &'a dyn AssetFetcher,
    pub staging: &'a StagingArea,
}

/// Renders `page` to its published text, staging the cover and images
/// under the document's staging directory as a side effect.
///
/// A failure while assembling the document is logged and yields an empty
/// document; it never propagates to the caller's batch.
pub async fn render_document(
    page: &Page,
    metadata: &PostMetadata,
    document_id: &str,
    sources: &DocumentSources<'_>,
) -> String {
    match assemble_document(page, metadata, document_id, sources).await {
        Ok(document) => document,
        Err(e) => {
            log::error!("Failed to assemble document for page {}: {}", page.id, e);
            String::new()
        }
    }
}

async fn assemble_document(
    page: &Page,
    metadata: &PostMetadata,
    document_id: &str,
    sources: &DocumentSources<'_>,
) -> Result<String, AppError> {
    let asset_dir = sources.staging.document_dir(document_id);
    tokio::fs::create_dir_all(&asset_dir).await?;

    let header = render_front_matter(metadata);

    if let Some(cover) = page.cover.as_ref() {
        let url = cover.url();
        if url.is_empty() {
            log::debug!("Cover of page {} has no URL", page.id);
        } else {
            stage_thumbnail(sources.assets, url, &asset_dir).await;
        }
    }

    let blocks = sources.content.fetch_block_children(&page.id.retag()).await;
    log::debug!("Rendering {} top-level blocks of page {}", blocks.len(), page.id);

    let renderer = DocumentRenderer::new(sources.content, sources.assets, asset_dir);
    let body = renderer
        .render_blocks(&blocks, RenderState::new())
        .await
        .into_iter()
        .filter(|span| !span.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(format!("{}\n{}", header, body))
}
