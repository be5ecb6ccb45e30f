use crate::types::{plain_text_of, RichTextItem};
use serde::{Deserialize, Serialize};

/// The property values this crate reads off a page.
///
/// Types it never inspects collapse into `Other`, keeping only the type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Title(Vec<RichTextItem>),
    RichText(Vec<RichTextItem>),
    Select(Option<String>),
    MultiSelect(Vec<String>),
    Status(Option<String>),
    /// Display names of the referenced people; unnamed users are skipped.
    People(Vec<String>),
    UniqueId(Option<UniqueIdData>),
    Other(String),
}

impl PropertyValue {
    /// Returns the Notion API type name for this property value.
    pub fn type_name(&self) -> &str {
        match self {
            PropertyValue::Title(_) => "title",
            PropertyValue::RichText(_) => "rich_text",
            PropertyValue::Select(_) => "select",
            PropertyValue::MultiSelect(_) => "multi_select",
            PropertyValue::Status(_) => "status",
            PropertyValue::People(_) => "people",
            PropertyValue::UniqueId(_) => "unique_id",
            PropertyValue::Other(type_name) => type_name.as_str(),
        }
    }

    /// Plain text for text-bearing properties.
    pub fn as_plain_text(&self) -> Option<String> {
        match self {
            PropertyValue::Title(items) | PropertyValue::RichText(items) => {
                Some(plain_text_of(items))
            }
            PropertyValue::Select(name) | PropertyValue::Status(name) => name.clone(),
            _ => None,
        }
    }
}

/// Auto-incrementing identifier of a database row, e.g. `POST-42`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueIdData {
    pub number: Option<i64>,
    pub prefix: Option<String>,
}

impl UniqueIdData {
    pub fn number(number: i64) -> Self {
        Self {
            number: Some(number),
            prefix: None,
        }
    }
}
