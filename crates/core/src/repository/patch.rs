use crate::document::config::BlockConfig;
use crate::document::model::Block;

/// A partial update to a block. Unset fields are left alone.
///
/// `id` and `order` are not patchable: ids are immutable and order follows
/// array position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockPatch {
    /// `Some(None)` clears the title.
    pub title: Option<Option<String>>,
    /// `Some(None)` clears the content.
    pub content: Option<Option<String>>,
    /// Replaces the entire config, and with it the block's type.
    pub config: Option<BlockConfig>,
    pub is_active: Option<bool>,
}

impl BlockPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(Some(title.into()));
        self
    }

    pub fn clear_title(mut self) -> Self {
        self.title = Some(None);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(Some(content.into()));
        self
    }

    pub fn config(mut self, config: BlockConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub(crate) fn apply(self, block: &mut Block) {
        if let Some(title) = self.title {
            block.title = title;
        }
        if let Some(content) = self.content {
            block.content = content;
        }
        if let Some(config) = self.config {
            block.config = config;
        }
        if let Some(is_active) = self.is_active {
            block.is_active = is_active;
        }
    }
}
