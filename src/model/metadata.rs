// src/model/metadata.rs
//! Post metadata resolved from a page's properties.

use super::{Page, PropertyValue};
use crate::constants::{
    AUTHOR_PROPERTY, CATEGORY_PROPERTY, DEFAULT_AUTHOR, DEFAULT_CATEGORY, DEFAULT_TITLE,
    DESCRIPTION_PROPERTY, FRONT_MATTER_DATE_FORMAT, SELECTOR_PROPERTY, TAGS_PROPERTY,
};

/// Everything the publisher and the front matter need to know about a post.
///
/// Every field has a default, so resolving metadata never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMetadata {
    pub title: String,
    /// Creation date as `YYYY/MM/DD`; empty when the page has no timestamp.
    pub date: String,
    pub description: String,
    pub tags: Vec<String>,
    pub author: String,
    pub category: String,
    /// External numeric identifier, rendered as a decimal string.
    pub selector_id: Option<String>,
}

impl PostMetadata {
    pub fn from_page(page: &Page) -> Self {
        Self {
            title: page
                .title_text()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            date: page
                .created_time
                .map(|created| created.format(FRONT_MATTER_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            description: resolve_description(page),
            tags: resolve_tags(page),
            author: resolve_author(page),
            category: resolve_category(page),
            selector_id: resolve_selector_id(page),
        }
    }

    /// Identifier used in storage keys and the staging directory.
    ///
    /// Pages without a selector identifier fall back to their page ID so
    /// that two such pages never share a key prefix.
    pub fn document_id(&self, page: &Page) -> String {
        self.selector_id
            .clone()
            .unwrap_or_else(|| page.id.as_str().to_string())
    }
}

fn resolve_description(page: &Page) -> String {
    match page.property(DESCRIPTION_PROPERTY) {
        Some(PropertyValue::RichText(items)) => items
            .first()
            .map(|item| item.plain_text.clone())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn resolve_tags(page: &Page) -> Vec<String> {
    match page.property(TAGS_PROPERTY) {
        Some(PropertyValue::MultiSelect(names)) => names.clone(),
        _ => Vec::new(),
    }
}

fn resolve_author(page: &Page) -> String {
    match page.property(AUTHOR_PROPERTY) {
        Some(PropertyValue::People(names)) => names.first().cloned(),
        _ => None,
    }
    .unwrap_or_else(|| DEFAULT_AUTHOR.to_string())
}

fn resolve_category(page: &Page) -> String {
    let named = match page.property(CATEGORY_PROPERTY) {
        Some(PropertyValue::Select(name)) => Some(name.clone()),
        _ => None,
    };

    named
        .or_else(|| {
            page.find_property(|value| match value {
                PropertyValue::Select(name) => Some(name.clone()),
                _ => None,
            })
        })
        .flatten()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

fn resolve_selector_id(page: &Page) -> Option<String> {
    let unique_number = |value: &PropertyValue| match value {
        PropertyValue::UniqueId(Some(data)) => data.number,
        _ => None,
    };

    match page.property(SELECTOR_PROPERTY) {
        Some(value) => unique_number(value),
        None => page.find_property(unique_number),
    }
    .map(|number| number.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UniqueIdData;
    use crate::types::{PageId, RichTextItem};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn page() -> Page {
        Page::new(PageId::parse("0123456789abcdef0123456789abcdef").unwrap())
    }

    #[test]
    fn defaults_for_a_bare_page() {
        let page = page();
        let meta = PostMetadata::from_page(&page);

        assert_eq!(meta.title, "Untitled");
        assert_eq!(meta.date, "");
        assert_eq!(meta.description, "");
        assert!(meta.tags.is_empty());
        assert_eq!(meta.author, "Anonymous");
        assert_eq!(meta.category, "web");
        assert_eq!(meta.selector_id, None);
        assert_eq!(meta.document_id(&page), "0123456789abcdef0123456789abcdef");
    }

    #[test]
    fn reads_every_field() {
        let page = page()
            .with_created_time(chrono::Utc.with_ymd_and_hms(2024, 3, 7, 23, 10, 0).unwrap())
            .with_property("Name", PropertyValue::Title(vec![RichTextItem::plain_text("Hello")]))
            .with_property(
                "description",
                PropertyValue::RichText(vec![
                    RichTextItem::plain_text("First run"),
                    RichTextItem::plain_text(" ignored"),
                ]),
            )
            .with_property(
                "tags",
                PropertyValue::MultiSelect(vec!["rust".to_string(), "notion".to_string()]),
            )
            .with_property("author", PropertyValue::People(vec!["Kim".to_string()]))
            .with_property("category", PropertyValue::Select(Some("infra".to_string())))
            .with_property("ID", PropertyValue::UniqueId(Some(UniqueIdData::number(42))));

        let meta = PostMetadata::from_page(&page);
        assert_eq!(meta.title, "Hello");
        assert_eq!(meta.date, "2024/03/07");
        assert_eq!(meta.description, "First run");
        assert_eq!(meta.tags, vec!["rust", "notion"]);
        assert_eq!(meta.author, "Kim");
        assert_eq!(meta.category, "infra");
        assert_eq!(meta.document_id(&page), "42");
    }

    #[test]
    fn category_falls_back_to_first_select() {
        let page = page()
            .with_property("Kind", PropertyValue::Select(Some("devops".to_string())))
            .with_property("Zone", PropertyValue::Select(Some("later".to_string())));
        assert_eq!(PostMetadata::from_page(&page).category, "devops");
    }

    #[test]
    fn empty_select_uses_default_category() {
        let page = page().with_property("category", PropertyValue::Select(None));
        assert_eq!(PostMetadata::from_page(&page).category, "web");
    }

    #[test]
    fn selector_prefers_the_id_property() {
        let page = page()
            .with_property("Alt", PropertyValue::UniqueId(Some(UniqueIdData::number(7))))
            .with_property("ID", PropertyValue::UniqueId(Some(UniqueIdData::number(42))));
        assert_eq!(PostMetadata::from_page(&page).selector_id.as_deref(), Some("42"));

        let page_without_id =
            self::page().with_property("Alt", PropertyValue::UniqueId(Some(UniqueIdData::number(7))));
        assert_eq!(
            PostMetadata::from_page(&page_without_id).selector_id.as_deref(),
            Some("7")
        );
    }
}
