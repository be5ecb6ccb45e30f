// src/model/blocks.rs
//! Payloads for each renderable block type.

use super::common::BlockCommon;
use crate::types::RichTextItem;
use serde::{Deserialize, Serialize};

/// Shared payload of every block whose content is a single rich-text run
/// sequence: paragraphs, headings, list items and quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub common: BlockCommon,
    pub rich_text: Vec<RichTextItem>,
}

impl TextBlock {
    pub fn new(common: BlockCommon, rich_text: Vec<RichTextItem>) -> Self {
        Self { common, rich_text }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub common: BlockCommon,
    pub rich_text: Vec<RichTextItem>,
    /// Declared language; `None` renders with the plaintext tag.
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub common: BlockCommon,
    pub image: Option<FileObject>,
    pub caption: Vec<RichTextItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalloutBlock {
    pub common: BlockCommon,
    pub rich_text: Vec<RichTextItem>,
    /// Emoji icon, when the callout carries one.
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToDoBlock {
    pub common: BlockCommon,
    pub rich_text: Vec<RichTextItem>,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerBlock {
    pub common: BlockCommon,
}

/// A block whose type this crate does not render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedBlock {
    pub common: BlockCommon,
    pub block_type: String,
}

/// A block of a supported type whose payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalformedBlock {
    pub common: BlockCommon,
    pub block_type: String,
    pub reason: String,
}

/// File reference as returned by the API: either hosted by Notion
/// (with a signed, expiring URL) or an external link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FileObject {
    #[serde(rename = "external")]
    External { external: ExternalFile },
    #[serde(rename = "file")]
    File { file: NotionFile },
}

impl FileObject {
    pub fn external(url: &str) -> Self {
        Self::External {
            external: ExternalFile {
                url: url.to_string(),
            },
        }
    }

    pub fn hosted(url: &str) -> Self {
        Self::File {
            file: NotionFile {
                url: url.to_string(),
                expiry_time: None,
            },
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::External { external } => &external.url,
            Self::File { file } => &file.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalFile {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotionFile {
    pub url: String,
    #[serde(default)]
    pub expiry_time: Option<chrono::DateTime<chrono::Utc>>,
}
