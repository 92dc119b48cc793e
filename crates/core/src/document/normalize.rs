//! Legacy content normalizer.
//!
//! Page content has been stored in three shapes over time:
//! - raw HTML or plain text (before the block editor existed)
//! - a bare JSON array of blocks
//! - the versioned envelope `{ "blocks": [...], "version": "2.0", "updatedAt": ... }`
//!
//! [`normalize`] accepts any of them and always yields a structurally valid
//! [`ContentDocument`]. Malformed input is recovered, never reported.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::config::{BlockConfig, TextConfig};
use super::id::{generate_block_id, legacy_block_id, LEGACY_CONTENT_ID};
use super::model::{Block, ContentDocument};

const LEGACY_TITLE: &str = "Content";

/// Convert a stored content string into a [`ContentDocument`]. Never fails.
pub fn normalize(raw: &str) -> ContentDocument {
    if raw.trim().is_empty() {
        return ContentDocument::default();
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => ContentDocument::new(decode_blocks(entries)),
        Ok(Value::Object(mut envelope)) => match envelope.remove("blocks") {
            Some(Value::Array(entries)) => ContentDocument {
                blocks: decode_blocks(entries),
                version: envelope
                    .get("version")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                updated_at: envelope
                    .get("updatedAt")
                    .and_then(Value::as_str)
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| dt.with_timezone(&Utc)),
            },
            _ => legacy_document(raw),
        },
        Ok(_) => legacy_document(raw),
        Err(err) => {
            tracing::debug!(error = %err, "stored content is not JSON, treating as legacy text");
            legacy_document(raw)
        }
    }
}

/// Wrap unrecognized stored content in a single text block.
fn legacy_document(raw: &str) -> ContentDocument {
    tracing::warn!(len = raw.len(), "falling back to legacy text block");
    ContentDocument::new(vec![Block {
        id: LEGACY_CONTENT_ID.to_string(),
        title: Some(LEGACY_TITLE.to_string()),
        content: Some(raw.to_string()),
        config: BlockConfig::Text(TextConfig::default()),
        order: 0,
        is_active: true,
    }])
}

fn decode_blocks(entries: Vec<Value>) -> Vec<Block> {
    let mut seen = HashSet::with_capacity(entries.len());
    let mut blocks = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let Value::Object(fields) = entry else {
            tracing::warn!(index, "dropping stored block that is not an object");
            continue;
        };
        let mut block = decode_block(index, fields);
        if !seen.insert(block.id.clone()) {
            let fresh = generate_block_id();
            tracing::warn!(index, duplicate = %block.id, %fresh, "reassigning duplicate block id");
            block.id = fresh.clone();
            seen.insert(fresh);
        }
        blocks.push(block);
    }

    blocks
}

fn decode_block(index: usize, mut fields: Map<String, Value>) -> Block {
    let id = match fields.remove("id") {
        Some(Value::String(id)) if !id.is_empty() => id,
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            tracing::warn!(index, "stored block has no id");
            legacy_block_id(index)
        }
    };
    let block_type = match fields.remove("type") {
        Some(Value::String(t)) if !t.is_empty() => t,
        _ => "text".to_string(),
    };
    let order = fields
        .get("order")
        .and_then(Value::as_u64)
        .and_then(|o| u32::try_from(o).ok())
        .unwrap_or(index as u32);
    let is_active = fields
        .get("isActive")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    Block {
        title: text_field(fields.remove("title")),
        content: text_field(fields.remove("content")),
        config: BlockConfig::from_parts(&block_type, fields.remove("config").unwrap_or(Value::Null)),
        id,
        order,
        is_active,
    }
}

fn text_field(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
