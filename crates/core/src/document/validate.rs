/// Document invariant checks.
use std::collections::HashSet;

use thiserror::Error;

use super::model::Block;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("block id cannot be empty (position {0})")]
    EmptyId(usize),
    #[error("duplicate block id: {0}")]
    DuplicateId(String),
    #[error("block {id} has order {found}, expected {expected}")]
    OrderGap {
        id: String,
        expected: u32,
        found: u32,
    },
    #[error("config of block {id} cannot be merged: {reason}")]
    ConfigMerge { id: String, reason: String },
}

/// Ids must be non-empty and unique.
pub fn validate_ids(blocks: &[Block]) -> Result<(), DocumentError> {
    let mut seen = HashSet::with_capacity(blocks.len());
    for (position, block) in blocks.iter().enumerate() {
        if block.id.is_empty() {
            return Err(DocumentError::EmptyId(position));
        }
        if !seen.insert(block.id.as_str()) {
            return Err(DocumentError::DuplicateId(block.id.clone()));
        }
    }
    Ok(())
}

/// `order` must equal array position.
pub fn validate_order(blocks: &[Block]) -> Result<(), DocumentError> {
    for (position, block) in blocks.iter().enumerate() {
        let expected = position as u32;
        if block.order != expected {
            return Err(DocumentError::OrderGap {
                id: block.id.clone(),
                expected,
                found: block.order,
            });
        }
    }
    Ok(())
}

/// Run every invariant an edited block list must satisfy.
pub fn validate_blocks(blocks: &[Block]) -> Result<(), DocumentError> {
    validate_ids(blocks)?;
    validate_order(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::config::{BlockConfig, TextConfig};

    fn block(id: &str, order: u32) -> Block {
        Block {
            id: id.to_string(),
            title: None,
            content: None,
            config: BlockConfig::Text(TextConfig::default()),
            order,
            is_active: true,
        }
    }

    #[test]
    fn accepts_contiguous_unique_blocks() {
        assert!(validate_blocks(&[block("a", 0), block("b", 1)]).is_ok());
        assert!(validate_blocks(&[]).is_ok());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = validate_blocks(&[block("a", 0), block("a", 1)]).unwrap_err();
        assert_eq!(err, DocumentError::DuplicateId("a".into()));
    }

    #[test]
    fn rejects_empty_id() {
        let err = validate_ids(&[block("a", 0), block("", 1)]).unwrap_err();
        assert_eq!(err, DocumentError::EmptyId(1));
    }

    #[test]
    fn rejects_order_gap() {
        let err = validate_order(&[block("a", 0), block("b", 2)]).unwrap_err();
        assert!(matches!(err, DocumentError::OrderGap { expected: 1, found: 2, .. }));
    }
}
