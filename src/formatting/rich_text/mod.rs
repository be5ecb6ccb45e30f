// src/formatting/rich_text/mod.rs
//! Rich text runs to Markdown.

mod annotations;

use annotations::{MarkdownStyleRenderer, TextStyle};

use crate::types::RichTextItem;

/// Renders runs in order, each wrapped by its annotations.
///
/// Pure: the same runs always produce the same string.
pub fn rich_text_to_markdown(items: &[RichTextItem]) -> String {
    items.iter().map(render_run).collect()
}

fn render_run(item: &RichTextItem) -> String {
    if item.plain_text.is_empty() {
        return String::new();
    }
    let style = TextStyle {
        annotations: item.annotations,
        link: item.link_target(),
    };
    MarkdownStyleRenderer::apply_styles(&item.plain_text, &style)
}
