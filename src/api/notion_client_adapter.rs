// src/api/notion_client_adapter.rs
//! Adapter layer for converting raw API objects into the domain model.
//!
//! Payloads are decoded with notion-client's types. Decoding happens one
//! object at a time so a single bad block or property never spoils the
//! rest of a response.

use crate::model::blocks::*;
use crate::model::common::BlockCommon;
use crate::model::{Block, Page, PropertyValue, UniqueIdData};
use crate::types::{Annotations, BlockId, Link, PageId, PropertyName, RichTextItem, RichTextType};
use notion_client::objects::block::{Block as NcBlock, BlockType, Icon as NcIcon};
use notion_client::objects::file::File as NcFile;
use notion_client::objects::page::PageProperty;
use notion_client::objects::rich_text::RichText as NcRichText;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::AppError;

/// Block type tags with a rendering rule.
pub const SUPPORTED_BLOCK_TYPES: &[&str] = &[
    "paragraph",
    "heading_1",
    "heading_2",
    "heading_3",
    "bulleted_list_item",
    "numbered_list_item",
    "quote",
    "code",
    "image",
    "callout",
    "to_do",
    "divider",
];

/// Converts one raw block object.
///
/// Never fails: an unknown type becomes `Block::Unsupported`, and a known
/// type whose payload does not decode becomes `Block::Malformed`.
pub fn convert_block_value(raw: Value) -> Block {
    let block_type = raw
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let common = raw_block_common(&raw);

    if !SUPPORTED_BLOCK_TYPES.contains(&block_type.as_str()) {
        return Block::Unsupported(UnsupportedBlock { common, block_type });
    }

    let decoded = serde_json::from_value::<NcBlock>(raw.clone())
        .map_err(AppError::from)
        .and_then(|notion_block| convert_block(notion_block, common.clone(), &raw));

    match decoded {
        Ok(block) => block,
        Err(e) => {
            log::warn!(
                "Could not decode {} block {}: {}",
                block_type,
                common.id,
                e
            );
            Block::Malformed(MalformedBlock {
                common,
                block_type,
                reason: e.to_string(),
            })
        }
    }
}

/// Reads the fields every block has straight off the JSON, so they survive
/// even when the typed payload does not decode.
fn raw_block_common(raw: &Value) -> BlockCommon {
    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| BlockId::parse(id).ok())
        .unwrap_or_else(|| {
            log::warn!("Block without a usable ID; assigning a random one");
            BlockId::new_v4()
        });

    BlockCommon {
        id,
        children: Vec::new(),
        has_children: raw
            .get("has_children")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        archived: raw.get("archived").and_then(Value::as_bool).unwrap_or(false),
    }
}

/// Convert a decoded notion-client block into our domain Block.
///
/// `raw` supplies the fields notion-client flattens into enums or omits
/// (code language, image caption).
fn convert_block(notion_block: NcBlock, common: BlockCommon, raw: &Value) -> Result<Block, AppError> {
    let block = match notion_block.block_type {
        BlockType::Paragraph { paragraph } => {
            Block::Paragraph(TextBlock::new(common, convert_rich_text_array(paragraph.rich_text)))
        }
        BlockType::Heading1 { heading_1 } => {
            Block::Heading1(TextBlock::new(common, convert_rich_text_array(heading_1.rich_text)))
        }
        BlockType::Heading2 { heading_2 } => {
            Block::Heading2(TextBlock::new(common, convert_rich_text_array(heading_2.rich_text)))
        }
        BlockType::Heading3 { heading_3 } => {
            Block::Heading3(TextBlock::new(common, convert_rich_text_array(heading_3.rich_text)))
        }
        BlockType::BulletedListItem { bulleted_list_item } => Block::BulletedListItem(
            TextBlock::new(common, convert_rich_text_array(bulleted_list_item.rich_text)),
        ),
        BlockType::NumberedListItem { numbered_list_item } => Block::NumberedListItem(
            TextBlock::new(common, convert_rich_text_array(numbered_list_item.rich_text)),
        ),
        BlockType::Quote { quote } => {
            Block::Quote(TextBlock::new(common, convert_rich_text_array(quote.rich_text)))
        }
        BlockType::Code { code } => Block::Code(CodeBlock {
            common,
            rich_text: convert_rich_text_array(code.rich_text),
            language: raw
                .pointer("/code/language")
                .and_then(Value::as_str)
                .filter(|language| !language.is_empty())
                .map(str::to_string),
        }),
        BlockType::Image { image } => Block::Image(ImageBlock {
            common,
            image: Some(convert_file_object(image.file_type)),
            caption: raw_rich_text(raw.pointer("/image/caption"))?,
        }),
        BlockType::Callout { callout } => Block::Callout(CalloutBlock {
            common,
            rich_text: convert_rich_text_array(callout.rich_text),
            icon: callout.icon.and_then(|icon| match icon {
                NcIcon::Emoji(notion_client::objects::emoji::Emoji::Emoji { emoji }) => {
                    Some(emoji)
                }
                NcIcon::File(_) => None,
            }),
        }),
        BlockType::ToDo { to_do } => Block::ToDo(ToDoBlock {
            common,
            rich_text: convert_rich_text_array(to_do.rich_text),
            checked: to_do.checked.unwrap_or(false),
        }),
        BlockType::Divider { .. } => Block::Divider(DividerBlock { common }),
        _ => {
            return Err(AppError::MalformedBlock {
                block_type: raw
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                reason: "payload does not match its type tag".to_string(),
            })
        }
    };
    Ok(block)
}

fn raw_rich_text(raw: Option<&Value>) -> Result<Vec<RichTextItem>, AppError> {
    match raw {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => {
            let runs: Vec<NcRichText> = serde_json::from_value(value.clone())?;
            Ok(convert_rich_text_array(runs))
        }
    }
}

/// Converts a raw database row.
pub fn convert_page_value(raw: Value) -> Result<Page, AppError> {
    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::MalformedResponse("page without an id".to_string()))?;
    let id = PageId::parse(id)?;

    let created_time = raw
        .get("created_time")
        .and_then(Value::as_str)
        .and_then(|ts| match chrono::DateTime::parse_from_rfc3339(ts) {
            Ok(parsed) => Some(parsed.with_timezone(&chrono::Utc)),
            Err(e) => {
                log::warn!("Page {} has an unparseable created_time '{}': {}", id, ts, e);
                None
            }
        });

    let cover = match raw.get("cover") {
        None | Some(Value::Null) => None,
        Some(cover) => match serde_json::from_value::<FileObject>(cover.clone()) {
            Ok(cover) => Some(cover),
            Err(e) => {
                log::warn!("Ignoring unreadable cover on page {}: {}", id, e);
                None
            }
        },
    };

    let properties = match raw.get("properties").and_then(Value::as_object) {
        Some(map) => convert_page_properties(map),
        None => BTreeMap::new(),
    };

    Ok(Page {
        id,
        url: raw
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        created_time,
        cover,
        properties,
        archived: raw.get("archived").and_then(Value::as_bool).unwrap_or(false),
    })
}

/// Convert page properties with graceful fallbacks
fn convert_page_properties(
    properties: &serde_json::Map<String, Value>,
) -> BTreeMap<PropertyName, PropertyValue> {
    properties
        .iter()
        .map(|(name, raw)| {
            let type_name = raw
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            let value = match serde_json::from_value::<PageProperty>(raw.clone()) {
                Ok(property) => convert_page_property(property, type_name),
                Err(e) => {
                    log::debug!("Keeping property '{}' as opaque {}: {}", name, type_name, e);
                    PropertyValue::Other(type_name.to_string())
                }
            };
            (PropertyName::new(name.as_str()), value)
        })
        .collect()
}

fn convert_page_property(property: PageProperty, type_name: &str) -> PropertyValue {
    match property {
        PageProperty::Title { title, .. } => PropertyValue::Title(convert_rich_text_array(title)),
        PageProperty::RichText { rich_text, .. } => {
            PropertyValue::RichText(convert_rich_text_array(rich_text))
        }
        PageProperty::Select { select, .. } => {
            PropertyValue::Select(select.and_then(|option| option.name))
        }
        PageProperty::MultiSelect { multi_select, .. } => PropertyValue::MultiSelect(
            multi_select
                .into_iter()
                .filter_map(|option| option.name)
                .collect(),
        ),
        PageProperty::Status { status, .. } => {
            PropertyValue::Status(status.and_then(|option| option.name))
        }
        PageProperty::People { people, .. } => {
            PropertyValue::People(people.into_iter().filter_map(|user| user.name).collect())
        }
        PageProperty::UniqueID { unique_id, .. } => {
            PropertyValue::UniqueId(unique_id.map(|uid| UniqueIdData {
                number: uid.number.and_then(|n| n.as_i64()),
                prefix: uid.prefix,
            }))
        }
        _ => PropertyValue::Other(type_name.to_string()),
    }
}

/// Convert array of rich text items
fn convert_rich_text_array(rich_texts: Vec<NcRichText>) -> Vec<RichTextItem> {
    rich_texts.into_iter().map(convert_rich_text).collect()
}

/// Convert single rich text item
fn convert_rich_text(rich_text: NcRichText) -> RichTextItem {
    match rich_text {
        NcRichText::Text {
            text,
            annotations,
            plain_text,
            href,
        } => RichTextItem {
            plain_text: plain_text.unwrap_or_else(|| text.content.clone()),
            text_type: RichTextType::Text {
                content: text.content,
                link: text.link.map(|link| Link { url: link.url }),
            },
            annotations: annotations.map(convert_annotations).unwrap_or_default(),
            href,
        },
        NcRichText::Mention {
            annotations,
            plain_text,
            href,
            ..
        } => RichTextItem {
            text_type: RichTextType::Mention,
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        },
        NcRichText::Equation {
            equation,
            annotations,
            plain_text,
            href,
        } => RichTextItem {
            text_type: RichTextType::Equation {
                expression: equation.expression,
            },
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        },
        _ => {
            log::debug!("Unsupported rich text run dropped to empty text");
            RichTextItem::plain_text("")
        }
    }
}

fn convert_annotations(annotations: notion_client::objects::rich_text::Annotations) -> Annotations {
    Annotations {
        bold: annotations.bold,
        italic: annotations.italic,
        strikethrough: annotations.strikethrough,
        underline: annotations.underline,
        code: annotations.code,
    }
}

fn convert_file_object(file: NcFile) -> FileObject {
    match file {
        NcFile::External { external } => FileObject::External {
            external: ExternalFile { url: external.url },
        },
        NcFile::File { file } => FileObject::File {
            file: NotionFile {
                url: file.url,
                expiry_time: Some(file.expiry_time),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rich(text: &str) -> Value {
        json!([{
            "type": "text",
            "text": { "content": text, "link": null },
            "annotations": {
                "bold": false, "italic": false, "strikethrough": false,
                "underline": false, "code": false, "color": "default"
            },
            "plain_text": text,
            "href": null
        }])
    }

    fn block(block_type: &str, payload: Value) -> Value {
        json!({
            "object": "block",
            "id": "c02fc1d3-db8b-45c5-a222-27595b15aea7",
            "type": block_type,
            "has_children": false,
            "archived": false,
            block_type: payload
        })
    }

    #[test]
    fn converts_a_paragraph() {
        let block = convert_block_value(block(
            "paragraph",
            json!({ "rich_text": rich("Hello"), "color": "default" }),
        ));
        match block {
            Block::Paragraph(p) => {
                assert_eq!(p.rich_text[0].plain_text, "Hello");
                assert_eq!(p.common.id.as_str(), "c02fc1d3db8b45c5a22227595b15aea7");
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn reads_code_language_from_the_raw_payload() {
        let block = convert_block_value(block(
            "code",
            json!({ "rich_text": rich("fn main() {}"), "caption": [], "language": "rust" }),
        ));
        match block {
            Block::Code(code) => assert_eq!(code.language.as_deref(), Some("rust")),
            other => panic!("expected code, got {:?}", other),
        }
    }

    #[test]
    fn unknown_types_become_unsupported() {
        let block = convert_block_value(block("table", json!({ "table_width": 2 })));
        assert_eq!(block.block_type(), "table");
        assert!(matches!(block, Block::Unsupported(_)));
    }

    #[test]
    fn broken_payloads_become_malformed() {
        let block = convert_block_value(block("paragraph", json!({ "rich_text": 42 })));
        match block {
            Block::Malformed(b) => {
                assert_eq!(b.block_type, "paragraph");
                assert_eq!(b.common.id.as_str(), "c02fc1d3db8b45c5a22227595b15aea7");
            }
            other => panic!("expected malformed, got {:?}", other),
        }
    }

    #[test]
    fn converts_page_properties_and_cover() {
        let page = convert_page_value(json!({
            "object": "page",
            "id": "59645fc6-e41d-48a3-a499-9d7b4cea76e0",
            "created_time": "2024-05-01T10:00:00.000Z",
            "url": "https://www.notion.so/59645fc6e41d48a3a4999d7b4cea76e0",
            "archived": false,
            "cover": { "type": "external", "external": { "url": "https://img.example.com/c.png" } },
            "properties": {
                "Name": { "id": "title", "type": "title", "title": rich("Hello") },
                "ID": { "id": "a", "type": "unique_id", "unique_id": { "number": 42, "prefix": null } },
                "category": { "id": "b", "type": "select", "select": { "id": "x", "name": "web", "color": "blue" } },
                "weird": { "id": "c", "type": "something_new", "something_new": {} }
            }
        }))
        .unwrap();

        assert_eq!(page.id.as_str(), "59645fc6e41d48a3a4999d7b4cea76e0");
        assert_eq!(page.title_text().as_deref(), Some("Hello"));
        assert_eq!(
            page.property("ID"),
            Some(&PropertyValue::UniqueId(Some(UniqueIdData::number(42))))
        );
        assert_eq!(
            page.property("category"),
            Some(&PropertyValue::Select(Some("web".to_string())))
        );
        assert_eq!(
            page.property("weird"),
            Some(&PropertyValue::Other("something_new".to_string()))
        );
        assert_eq!(page.cover.unwrap().url(), "https://img.example.com/c.png");
        assert!(page.created_time.is_some());
    }
}
