use super::blocks::*;
use super::common::BlockCommon;
use crate::types::{BlockId, RichTextItem};
use serde::{Deserialize, Serialize};

/// Macro to reduce boilerplate in Block enum methods
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Paragraph($pattern) => $result,
            Block::Heading1($pattern) => $result,
            Block::Heading2($pattern) => $result,
            Block::Heading3($pattern) => $result,
            Block::BulletedListItem($pattern) => $result,
            Block::NumberedListItem($pattern) => $result,
            Block::Quote($pattern) => $result,
            Block::Code($pattern) => $result,
            Block::Image($pattern) => $result,
            Block::Callout($pattern) => $result,
            Block::ToDo($pattern) => $result,
            Block::Divider($pattern) => $result,
            Block::Unsupported($pattern) => $result,
            Block::Malformed($pattern) => $result,
        }
    };
}

/// One node of the remote content tree.
///
/// The set of renderable types is closed; anything else arrives as
/// `Unsupported`, and a recognised type with an undecodable payload
/// arrives as `Malformed`, so both stay visible in rendered output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(TextBlock),
    Heading1(TextBlock),
    Heading2(TextBlock),
    Heading3(TextBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    Quote(TextBlock),
    Code(CodeBlock),
    Image(ImageBlock),
    Callout(CalloutBlock),
    ToDo(ToDoBlock),
    Divider(DividerBlock),
    Unsupported(UnsupportedBlock),
    Malformed(MalformedBlock),
}

impl Block {
    pub fn id(&self) -> &BlockId {
        match_all_blocks!(self, b => &b.common.id)
    }

    pub fn children(&self) -> &[Block] {
        match_all_blocks!(self, b => &b.common.children)
    }

    pub fn has_children(&self) -> bool {
        self.common().has_children
    }

    pub fn common(&self) -> &BlockCommon {
        match_all_blocks!(self, b => &b.common)
    }

    pub fn common_mut(&mut self) -> &mut BlockCommon {
        match_all_blocks!(self, b => &mut b.common)
    }

    /// The API's type tag for this block, e.g. `numbered_list_item`.
    pub fn block_type(&self) -> &str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading1(_) => "heading_1",
            Block::Heading2(_) => "heading_2",
            Block::Heading3(_) => "heading_3",
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::NumberedListItem(_) => "numbered_list_item",
            Block::Quote(_) => "quote",
            Block::Code(_) => "code",
            Block::Image(_) => "image",
            Block::Callout(_) => "callout",
            Block::ToDo(_) => "to_do",
            Block::Divider(_) => "divider",
            Block::Unsupported(b) => b.block_type.as_str(),
            Block::Malformed(b) => b.block_type.as_str(),
        }
    }

    pub fn is_numbered_list_item(&self) -> bool {
        matches!(self, Block::NumberedListItem(_))
    }

    // Constructors used by adapters and tests.

    pub fn paragraph(text: &str) -> Self {
        Block::Paragraph(TextBlock::new(
            BlockCommon::default(),
            vec![RichTextItem::plain_text(text)],
        ))
    }

    pub fn bulleted(text: &str) -> Self {
        Block::BulletedListItem(TextBlock::new(
            BlockCommon::default(),
            vec![RichTextItem::plain_text(text)],
        ))
    }

    pub fn numbered(text: &str) -> Self {
        Block::NumberedListItem(TextBlock::new(
            BlockCommon::default(),
            vec![RichTextItem::plain_text(text)],
        ))
    }

    pub fn unsupported(block_type: &str) -> Self {
        Block::Unsupported(UnsupportedBlock {
            common: BlockCommon::default(),
            block_type: block_type.to_string(),
        })
    }

    pub fn malformed(block_type: &str, reason: &str) -> Self {
        Block::Malformed(MalformedBlock {
            common: BlockCommon::default(),
            block_type: block_type.to_string(),
            reason: reason.to_string(),
        })
    }

    /// Same block with its children preloaded.
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        let common = self.common_mut();
        common.has_children = !children.is_empty();
        common.children = children;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_type_tags_match_the_api() {
        assert_eq!(Block::numbered("x").block_type(), "numbered_list_item");
        assert_eq!(Block::unsupported("table").block_type(), "table");
        assert_eq!(Block::malformed("code", "bad").block_type(), "code");
    }

    #[test]
    fn preloaded_children_do_not_need_fetching() {
        let parent = Block::numbered("parent").with_children(vec![Block::numbered("child")]);
        assert!(parent.has_children());
        assert!(!parent.common().needs_child_fetch());
        assert_eq!(parent.children().len(), 1);
    }
}
