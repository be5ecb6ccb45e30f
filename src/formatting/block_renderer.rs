// src/formatting/block_renderer.rs
//! Block rendering engine: converts a block tree to Markdown.
//!
//! Rendering is recursive and async because children are fetched on
//! demand and images are staged while the tree is walked. State travels
//! by value; a block never sees another run's list counter.

use super::rich_text::rich_text_to_markdown;
use super::state::RenderState;
use crate::api::ContentClient;
use crate::assets::AssetFetcher;
use crate::constants::{BULLET_MARKER, CHILD_INDENT, DEFAULT_CODE_LANGUAGE, DIVIDER_TOKEN};
use crate::error::AppError;
use crate::model::blocks::{CalloutBlock, CodeBlock, ImageBlock, ToDoBlock};
use crate::model::Block;
use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};

/// The rendered span of one block together with the state for its next sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRenderResult {
    pub content: String,
    pub state: RenderState,
}

/// Renders the blocks of one document.
///
/// Children come from `content`; images are staged under `asset_dir`
/// through `assets`.
pub struct DocumentRenderer<'a> {
    content: &'a ContentClient,
    assets: &'a dyn AssetFetcher,
    asset_dir: PathBuf,
}

impl<'a> DocumentRenderer<'a> {
    pub fn new(
        content: &'a ContentClient,
        assets: &'a dyn AssetFetcher,
        asset_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            content,
            assets,
            asset_dir: asset_dir.into(),
        }
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    /// Renders a run of sibling blocks, one span per block, in order.
    /// Archived blocks are skipped.
    pub async fn render_blocks(&self, blocks: &[Block], state: RenderState) -> Vec<String> {
        let mut state = state;
        let mut spans = Vec::with_capacity(blocks.len());
        for block in blocks {
            if block.common().archived {
                log::debug!("Skipping archived block {}", block.id());
                continue;
            }
            let result = self.render_block(block, state).await;
            spans.push(result.content);
            state = result.state;
        }
        spans
    }

    /// Renders one block and, below it, its children.
    ///
    /// Never fails: a block whose own rendering fails is replaced by a
    /// `[TYPE BLOCK ERROR]` placeholder and its siblings are unaffected.
    pub fn render_block<'b>(
        &'b self,
        block: &'b Block,
        state: RenderState,
    ) -> BoxFuture<'b, BlockRenderResult> {
        async move {
            let state = state.observe(block);

            let own = match self.render_own(block, &state).await {
                Ok(text) => text,
                Err(e) => {
                    log::error!(
                        "Failed to render {} block {}: {}",
                        block.block_type(),
                        block.id(),
                        e
                    );
                    error_placeholder(block.block_type())
                }
            };

            let children = self.render_children(block, state).await;
            let content = if children.is_empty() {
                own
            } else {
                format!("{}\n{}", own, children)
            };

            BlockRenderResult { content, state }
        }
        .boxed()
    }

    /// Children of `block`, each line indented one level, joined by newlines.
    async fn render_children(&self, block: &Block, state: RenderState) -> String {
        if !block.has_children() {
            return String::new();
        }
        if state.depth_limit_reached() {
            log::warn!(
                "Not expanding children of {} beyond depth {}",
                block.id(),
                state.depth()
            );
            return String::new();
        }

        let fetched;
        let children: &[Block] = if block.common().needs_child_fetch() {
            fetched = self.content.fetch_block_children(block.id()).await;
            &fetched
        } else {
            block.children()
        };

        self.render_blocks(children, state.enter_children())
            .await
            .into_iter()
            .filter(|span| !span.trim().is_empty())
            .map(|span| indent_block_content(&span, CHILD_INDENT))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The block's own line(s), without children.
    async fn render_own(&self, block: &Block, state: &RenderState) -> Result<String, AppError> {
        let text = match block {
            Block::Paragraph(b) => rich_text_to_markdown(&b.rich_text),
            Block::Heading1(b) => format!("# {}", rich_text_to_markdown(&b.rich_text)),
            Block::Heading2(b) => format!("## {}", rich_text_to_markdown(&b.rich_text)),
            Block::Heading3(b) => format!("### {}", rich_text_to_markdown(&b.rich_text)),
            Block::BulletedListItem(b) => {
                format!("{} {}", BULLET_MARKER, rich_text_to_markdown(&b.rich_text))
            }
            Block::NumberedListItem(b) => format!(
                "{}. {}",
                state.list_number(),
                rich_text_to_markdown(&b.rich_text)
            ),
            Block::Quote(b) => format!("> {}", rich_text_to_markdown(&b.rich_text)),
            Block::Code(code) => format_code(code),
            Block::Image(image) => self.format_image(image).await,
            Block::Callout(callout) => format_callout(callout),
            Block::ToDo(todo) => format_todo(todo),
            Block::Divider(_) => DIVIDER_TOKEN.to_string(),
            Block::Unsupported(b) => unsupported_placeholder(&b.block_type),
            Block::Malformed(b) => {
                return Err(AppError::MalformedBlock {
                    block_type: b.block_type.clone(),
                    reason: b.reason.clone(),
                })
            }
        };
        Ok(text)
    }

    /// Stages the image locally and references the staged file by name,
    /// falling back to the remote URL when staging fails.
    async fn format_image(&self, image: &ImageBlock) -> String {
        let caption = rich_text_to_markdown(&image.caption);
        let url = match image.image.as_ref().map(|file| file.url()) {
            Some(url) if !url.is_empty() => url,
            _ => return "![Image]".to_string(),
        };

        match self.assets.fetch(url, &self.asset_dir).await {
            Ok(path) => match path.file_name() {
                Some(name) => format!("![{}]({})", caption, name.to_string_lossy()),
                None => format!("![{}]({})", caption, url),
            },
            Err(e) => {
                log::warn!("Image staging failed, linking remote URL: {}", e);
                format!("![{}]({})", caption, url)
            }
        }
    }
}

fn format_code(code: &CodeBlock) -> String {
    let language = code.language.as_deref().unwrap_or(DEFAULT_CODE_LANGUAGE);
    format!(
        "```{}\n{}\n```",
        language,
        rich_text_to_markdown(&code.rich_text)
    )
}

fn format_callout(callout: &CalloutBlock) -> String {
    let text = rich_text_to_markdown(&callout.rich_text);
    match callout.icon.as_deref() {
        Some(icon) if !icon.is_empty() => format!("> {} {}", icon, text),
        _ => format!("> {}", text),
    }
}

fn format_todo(todo: &ToDoBlock) -> String {
    let checkbox = if todo.checked { "[x]" } else { "[ ]" };
    format!("{} {}", checkbox, rich_text_to_markdown(&todo.rich_text))
}

pub fn unsupported_placeholder(block_type: &str) -> String {
    format!("[{} BLOCK NOT SUPPORTED]", block_type.to_uppercase())
}

pub fn error_placeholder(block_type: &str) -> String {
    format!("[{} BLOCK ERROR]", block_type.to_uppercase())
}

/// Prefixes every line with `indent`, blank lines included.
fn indent_block_content(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", indent, line))
        .collect::<Vec<_>>()
        .join("\n")
}
