// src/formatting/mod.rs
//! Renders pages and their block trees into Markdown documents.

// Sub-modules
pub mod block_renderer;
mod document;
mod front_matter;
mod rich_text;
mod state;

pub use self::block_renderer::{BlockRenderResult, DocumentRenderer};
pub use self::document::{render_document, DocumentSources};
pub use self::front_matter::render_front_matter;
pub use self::rich_text::rich_text_to_markdown;
pub use self::state::RenderState;
