// src/formatting/rich_text/annotations.rs
//! Markdown wrapping for annotated text runs.

use crate::types::Annotations;

/// Visual style of one run, with the resolved link target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStyle<'a> {
    pub annotations: Annotations,
    pub link: Option<&'a str>,
}

/// Renderer for text styles to Markdown.
pub struct MarkdownStyleRenderer;

impl MarkdownStyleRenderer {
    /// Wraps `content` in its style markers.
    ///
    /// Markers nest in a fixed order, innermost first: bold, italic,
    /// strikethrough, underline, inline code, hyperlink. Bold + italic +
    /// code therefore always renders as `` `***text***` ``.
    pub fn apply_styles(content: &str, style: &TextStyle<'_>) -> String {
        let a = &style.annotations;
        let mut result = content.to_string();

        if a.bold {
            result = format!("**{}**", result);
        }
        if a.italic {
            result = format!("*{}*", result);
        }
        if a.strikethrough {
            result = format!("~~{}~~", result);
        }
        // Markdown has no underline.
        if a.underline {
            result = format!("<u>{}</u>", result);
        }
        if a.code {
            result = format!("`{}`", result);
        }
        if let Some(url) = style.link {
            result = format!("[{}]({})", result, url);
        }

        result
    }
}
