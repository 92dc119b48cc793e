use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::config::{BlockConfig, BlockKind};

/// Envelope version written on every save.
pub const DOCUMENT_VERSION: &str = "2.0";

/// A page's content: a versioned envelope around its ordered block list.
///
/// Stored as a JSON string in the page record's `content` field and replaced
/// wholesale on every save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContentDocument {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            version: None,
            updated_at: None,
        }
    }

    /// The save envelope: same blocks, current version, stamped with `now`.
    pub fn stamped(blocks: Vec<Block>, now: DateTime<Utc>) -> Self {
        Self {
            blocks,
            version: Some(DOCUMENT_VERSION.to_string()),
            updated_at: Some(now),
        }
    }

    /// Serialize to the stored string form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Active blocks in display sequence (`order` ascending, ties keep array order).
    pub fn display_blocks(&self) -> Vec<&Block> {
        display_sequence(&self.blocks)
    }
}

/// Filter out inactive blocks and sort the rest by `order`.
pub fn display_sequence(blocks: &[Block]) -> Vec<&Block> {
    let mut visible: Vec<&Block> = blocks.iter().filter(|b| b.is_active).collect();
    visible.sort_by_key(|b| b.order);
    visible
}

/// A single typed unit of page content.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "StoredBlock")]
pub struct Block {
    pub id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    /// Type-specific configuration; its variant determines the block's type.
    pub config: BlockConfig,
    pub order: u32,
    pub is_active: bool,
}

impl Block {
    /// The modelled kind, `None` when the block carries an unrecognized type.
    pub fn kind(&self) -> Option<BlockKind> {
        self.config.kind()
    }

    /// The stored `type` string.
    pub fn block_type(&self) -> &str {
        self.config.type_name()
    }
}

/// Wire shape of a block as it appears in storage.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredBlock {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    config: Value,
    #[serde(default)]
    order: u32,
    #[serde(default = "default_active")]
    is_active: bool,
}

fn default_active() -> bool {
    true
}

impl From<StoredBlock> for Block {
    fn from(stored: StoredBlock) -> Self {
        Block {
            config: BlockConfig::from_parts(&stored.block_type, stored.config),
            id: stored.id,
            title: stored.title,
            content: stored.content,
            order: stored.order,
            is_active: stored.is_active,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredBlockRef<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    block_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    config: &'a BlockConfig,
    order: u32,
    is_active: bool,
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StoredBlockRef {
            id: &self.id,
            block_type: self.block_type(),
            title: self.title.as_deref(),
            content: self.content.as_deref(),
            config: &self.config,
            order: self.order,
            is_active: self.is_active,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::config::{ImageConfig, TextConfig};
    use chrono::TimeZone;
    use serde_json::json;

    fn text_block(id: &str, order: u32, is_active: bool) -> Block {
        Block {
            id: id.to_string(),
            title: None,
            content: Some("<p>x</p>".to_string()),
            config: BlockConfig::Text(TextConfig::default()),
            order,
            is_active,
        }
    }

    #[test]
    fn block_serializes_to_stored_shape() {
        let block = Block {
            id: "img".into(),
            title: Some("Hero".into()),
            content: Some(String::new()),
            config: BlockConfig::Image(ImageConfig {
                image_url: "/a.png".into(),
                ..ImageConfig::default()
            }),
            order: 2,
            is_active: false,
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], json!("image"));
        assert_eq!(value["isActive"], json!(false));
        assert_eq!(value["config"]["imageUrl"], json!("/a.png"));
        assert_eq!(value["order"], json!(2));
    }

    #[test]
    fn block_round_trips_through_json() {
        let block = text_block("t1", 0, true);
        let json = serde_json::to_string(&block).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn absent_title_is_not_serialized() {
        let value = serde_json::to_value(text_block("t1", 0, true)).unwrap();
        assert!(value.get("title").is_none());
    }

    #[test]
    fn is_active_defaults_to_true() {
        let block: Block =
            serde_json::from_value(json!({"id": "a", "type": "text", "order": 0})).unwrap();
        assert!(block.is_active);
        assert_eq!(block.kind(), Some(BlockKind::Text));
    }

    #[test]
    fn stamped_document_carries_version_and_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let doc = ContentDocument::stamped(vec![], now);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["version"], json!("2.0"));
        assert_eq!(value["updatedAt"], json!("2024-05-01T12:00:00Z"));
        assert_eq!(value["blocks"], json!([]));
    }

    #[test]
    fn display_blocks_filters_and_sorts() {
        let doc = ContentDocument::new(vec![
            text_block("c", 2, true),
            text_block("hidden", 0, false),
            text_block("a", 0, true),
            text_block("b", 1, true),
        ]);
        let ids: Vec<&str> = doc.display_blocks().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
