use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A block to create.
///
/// Only `type` is required. The shape of `content` depends on the block type:
/// a string for text blocks, an object such as `{"title", "front_color"}` for
/// headings. Fields this struct does not name are passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockCreate {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_alignment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockCreate {
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            content: None,
            text_alignment: None,
            level: None,
            extra: Map::new(),
        }
    }

    /// Plain text block
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(Value::String(content.into())),
            ..Self::new("text")
        }
    }

    /// Heading block at `level` (1-6)
    pub fn heading(level: u8, title: impl Into<String>) -> Self {
        Self {
            content: Some(serde_json::json!({ "title": title.into() })),
            level: Some(level),
            ..Self::new("heading")
        }
    }

    pub fn with_alignment(mut self, alignment: impl Into<String>) -> Self {
        self.text_alignment = Some(alignment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_text_block() {
        let block = BlockCreate::text("hello").with_alignment("left");
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"type": "text", "content": "hello", "text_alignment": "left"})
        );
    }

    #[test]
    fn test_heading_block_has_level() {
        let block = BlockCreate::heading(1, "Title");
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "heading");
        assert_eq!(value["level"], 1);
        assert_eq!(value["content"]["title"], "Title");
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let raw = json!({"type": "code", "content": "fn main() {}", "language": "rust"});
        let block: BlockCreate = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(block.block_type, "code");
        assert_eq!(block.extra.get("language"), Some(&json!("rust")));
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }

    #[test]
    fn test_type_is_required() {
        let result = serde_json::from_value::<BlockCreate>(json!({"content": "x"}));
        assert!(result.is_err());
    }
}
