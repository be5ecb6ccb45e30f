// src/formatting/front_matter.rs
//! The metadata header that opens every published document.

use crate::model::PostMetadata;

/// Renders the `---` delimited header for `metadata`.
///
/// The block always ends with the closing delimiter and a newline.
pub fn render_front_matter(metadata: &PostMetadata) -> String {
    format!(
        "---\ntitle: {}\ndate: {}\ndescription: {}\ntags: {}\nauthor: {}\n---\n",
        metadata.title,
        metadata.date,
        metadata.description,
        format_tag_list(&metadata.tags),
        metadata.author,
    )
}

/// Inline list of quoted tags: `['a', 'b']`, or `[]` when empty.
fn format_tag_list(tags: &[String]) -> String {
    let quoted: Vec<String> = tags.iter().map(|tag| quote_tag(tag)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Single quotes unless the tag itself contains one and no double quote.
fn quote_tag(tag: &str) -> String {
    if tag.contains('\'') && !tag.contains('"') {
        return format!("\"{}\"", tag.replace('\\', "\\\\"));
    }
    let escaped = tag.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn metadata(tags: &[&str]) -> PostMetadata {
        PostMetadata {
            title: "Hello".to_string(),
            date: "2024/03/07".to_string(),
            description: "First post".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: "Ada".to_string(),
            category: "web".to_string(),
            selector_id: Some("42".to_string()),
        }
    }

    #[test]
    fn header_layout() {
        let header = render_front_matter(&metadata(&["rust", "notion"]));
        assert!(header.ends_with("---\n"));
        insta::assert_snapshot!(header.trim_end(), @r"
        ---
        title: Hello
        date: 2024/03/07
        description: First post
        tags: ['rust', 'notion']
        author: Ada
        ---
        ");
    }

    #[test]
    fn empty_tags_render_as_empty_list() {
        let header = render_front_matter(&metadata(&[]));
        assert!(header.contains("\ntags: []\n"));
        assert!(header.ends_with("---\n"));
    }

    #[test]
    fn tags_with_quotes() {
        assert_eq!(
            format_tag_list(&["it's".to_string(), "plain".to_string()]),
            "[\"it's\", 'plain']"
        );
    }
}
