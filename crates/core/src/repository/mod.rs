//! In-memory CRUD and reorder engine over a document's block list.
//!
//! One authoring session owns one repository; every operation is synchronous
//! and total. After each mutation the array position is authoritative and
//! `order` is rewritten to `0..N-1` to match it.

mod patch;

pub use patch::BlockPatch;

use std::collections::HashSet;

use serde_json::Value;

use crate::document::config::{BlockConfig, BlockKind};
use crate::document::id::generate_block_id;
use crate::document::model::{display_sequence, Block, ContentDocument};
use crate::document::validate::{validate_blocks, DocumentError};
use crate::layout::{rewrite_float_images, Float};

const TEXT_PLACEHOLDER: &str = "<p>Start writing...</p>";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockRepository {
    blocks: Vec<Block>,
}

impl BlockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a loaded document's blocks, in stored array order.
    pub fn from_document(document: ContentDocument) -> Self {
        let mut repo = Self {
            blocks: document.blocks,
        };
        repo.renumber();
        repo
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Active blocks in display sequence.
    pub fn active_blocks(&self) -> Vec<&Block> {
        display_sequence(&self.blocks)
    }

    /// Snapshot the current blocks as an unstamped document.
    pub fn to_document(&self) -> ContentDocument {
        ContentDocument::new(self.blocks.clone())
    }

    /// Check ids and ordering.
    pub fn validate(&self) -> Result<(), DocumentError> {
        validate_blocks(&self.blocks)
    }

    /// Append a new block of `kind` with its default config.
    pub fn add(&mut self, kind: BlockKind) -> &Block {
        let block = Block {
            id: generate_block_id(),
            title: match kind {
                BlockKind::Text => None,
                other => Some(format!("New {}", other.label())),
            },
            content: Some(match kind {
                BlockKind::Text => TEXT_PLACEHOLDER.to_string(),
                _ => String::new(),
            }),
            config: BlockConfig::default_for(kind),
            order: self.blocks.len() as u32,
            is_active: true,
        };
        tracing::debug!(id = %block.id, kind = %kind, "block added");
        self.blocks.push(block);
        self.check();
        &self.blocks[self.blocks.len() - 1]
    }

    /// Apply `patch` to the block `id`. A config in the patch replaces the
    /// whole config; use [`BlockRepository::merge_config`] to merge fields.
    /// Returns `false` if no such block exists.
    pub fn update(&mut self, id: &str, patch: BlockPatch) -> bool {
        let Some(block) = self.find_mut(id) else {
            tracing::debug!(id, "update ignored, no such block");
            return false;
        };
        patch.apply(block);
        tracing::debug!(id, "block updated");
        true
    }

    /// Deep-merge a JSON object into the block's current config.
    ///
    /// Objects merge key by key; any other value replaces. The merged value
    /// is decoded against the block's existing type.
    pub fn merge_config(&mut self, id: &str, changes: Value) -> Result<bool, DocumentError> {
        let Some(block) = self.find_mut(id) else {
            return Ok(false);
        };
        if !changes.is_object() {
            return Err(DocumentError::ConfigMerge {
                id: id.to_string(),
                reason: "changes must be a JSON object".to_string(),
            });
        }
        let mut merged = block.config.to_value();
        if !merged.is_object() {
            merged = Value::Object(Default::default());
        }
        merge_json(&mut merged, changes);
        let config = BlockConfig::from_parts(block.config.type_name(), merged);
        if block.config.kind().is_some() && config.kind().is_none() {
            return Err(DocumentError::ConfigMerge {
                id: id.to_string(),
                reason: format!("result is not a valid {} config", block.config.type_name()),
            });
        }
        block.config = config;
        tracing::debug!(id, "block config merged");
        Ok(true)
    }

    /// Remove a block and renumber the rest by array position.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        let removed = self.blocks.len() != before;
        if removed {
            self.renumber();
            tracing::debug!(id, remaining = self.blocks.len(), "block deleted");
        }
        removed
    }

    /// Flip `is_active`. Nothing else changes.
    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        match self.find_mut(id) {
            Some(block) => {
                block.is_active = !block.is_active;
                tracing::debug!(id, is_active = block.is_active, "block visibility toggled");
                true
            }
            None => false,
        }
    }

    /// Put the blocks named in `active_sequence` first, in that order, then
    /// every block not named (inactive ones included) in its current relative
    /// order. Unknown and repeated ids are ignored. The block count never changes.
    pub fn reorder<S: AsRef<str>>(&mut self, active_sequence: &[S]) {
        let mut remaining = std::mem::take(&mut self.blocks);
        let mut placed = HashSet::new();
        let mut reordered = Vec::with_capacity(remaining.len());

        for id in active_sequence {
            let id = id.as_ref();
            if !placed.insert(id.to_string()) {
                continue;
            }
            if let Some(pos) = remaining.iter().position(|b| b.id == id) {
                reordered.push(remaining.remove(pos));
            }
        }

        if remaining.iter().any(|b| b.is_active) {
            tracing::warn!(
                omitted = remaining.iter().filter(|b| b.is_active).count(),
                "reorder sequence omitted active blocks; keeping them after the sequence"
            );
        }
        reordered.extend(remaining);

        self.blocks = reordered;
        self.renumber();
        tracing::debug!(count = self.blocks.len(), "blocks reordered");
    }

    /// Insert a copy of `id` with a fresh id directly after it.
    pub fn duplicate(&mut self, id: &str) -> Option<&Block> {
        let pos = self.blocks.iter().position(|b| b.id == id)?;
        let mut copy = self.blocks[pos].clone();
        copy.id = generate_block_id();
        self.blocks.insert(pos + 1, copy);
        self.renumber();
        tracing::debug!(source = id, copy = %self.blocks[pos + 1].id, "block duplicated");
        Some(&self.blocks[pos + 1])
    }

    /// Change the float state of the `index`-th image inside a text block.
    /// An explicit width on the image is kept.
    pub fn set_image_float(&mut self, block_id: &str, index: usize, float: Float) -> bool {
        self.edit_float_image(block_id, index, |image| image.set_float(float))
    }

    /// Set (or, with a blank value, clear) the explicit width of the
    /// `index`-th image inside a text block.
    pub fn set_image_width(&mut self, block_id: &str, index: usize, width: &str) -> bool {
        self.edit_float_image(block_id, index, |image| image.set_width(width))
    }

    fn edit_float_image<F>(&mut self, block_id: &str, index: usize, mut edit: F) -> bool
    where
        F: FnMut(&mut crate::layout::FloatImage),
    {
        let Some(block) = self.find_mut(block_id) else {
            return false;
        };
        if block.kind() != Some(BlockKind::Text) {
            return false;
        }
        let Some(content) = block.content.as_deref() else {
            return false;
        };

        let mut found = false;
        let rewritten = rewrite_float_images(content, |i, image| {
            if i == index {
                edit(image);
                found = true;
            }
        });
        if found {
            block.content = Some(rewritten);
        }
        found
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    fn renumber(&mut self) {
        for (position, block) in self.blocks.iter_mut().enumerate() {
            block.order = position as u32;
        }
        self.check();
    }

    fn check(&self) {
        if let Err(err) = self.validate() {
            tracing::error!(error = %err, "block list invariant violated");
        }
    }
}

fn merge_json(target: &mut Value, changes: Value) {
    match (target, changes) {
        (Value::Object(target), Value::Object(changes)) => {
            for (key, value) in changes {
                let nested = value.is_object() && target.get(&key).is_some_and(Value::is_object);
                if let (true, Some(existing)) = (nested, target.get_mut(&key)) {
                    merge_json(existing, value);
                    continue;
                }
                target.insert(key, value);
            }
        }
        (target, changes) => *target = changes,
    }
}
