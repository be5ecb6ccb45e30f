mod block;
pub mod blocks;
pub mod common;
mod metadata;
mod property_value;

pub use block::Block;
pub use blocks::*;
pub use common::*;
pub use metadata::PostMetadata;
pub use property_value::{PropertyValue, UniqueIdData};

use crate::types::{PageId, PropertyName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A row of the source database: one post.
///
/// Properties are kept in name order so that "first property of a type"
/// lookups are stable across fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub url: String,
    pub created_time: Option<DateTime<Utc>>,
    pub cover: Option<FileObject>,
    pub properties: BTreeMap<PropertyName, PropertyValue>,
    pub archived: bool,
}

impl Page {
    pub fn new(id: PageId) -> Self {
        Self {
            id,
            url: String::new(),
            created_time: None,
            cover: None,
            properties: BTreeMap::new(),
            archived: false,
        }
    }

    pub fn with_property(mut self, name: &str, value: PropertyValue) -> Self {
        self.properties.insert(PropertyName::from(name), value);
        self
    }

    pub fn with_created_time(mut self, created_time: DateTime<Utc>) -> Self {
        self.created_time = Some(created_time);
        self
    }

    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    pub fn with_cover(mut self, cover: FileObject) -> Self {
        self.cover = Some(cover);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// First property (in name order) for which `select` returns a value.
    pub fn find_property<'a, T>(
        &'a self,
        select: impl Fn(&'a PropertyValue) -> Option<T>,
    ) -> Option<T> {
        self.properties.values().find_map(select)
    }

    /// Plain text of the page's title property, if it has a non-blank one.
    pub fn title_text(&self) -> Option<String> {
        self.find_property(|value| match value {
            PropertyValue::Title(items) => Some(crate::types::plain_text_of(items)),
            _ => None,
        })
        .filter(|title| !title.trim().is_empty())
    }
}
