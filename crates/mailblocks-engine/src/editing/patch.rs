use std::collections::HashMap;

use crate::blocks::{Block, BlockId};
use crate::editing::Document;

/// Summary of one change to a session's document, delivered to observers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    /// Blocks that were inserted, edited, or changed position, in render order
    pub changed: Vec<BlockId>,
    /// Blocks no longer present
    pub removed: Vec<BlockId>,
    /// Global styles or settings differ
    pub settings_changed: bool,
    pub version: u64,
}

impl Patch {
    /// Describe the difference between two document states
    pub fn between(before: &Document, after: &Document, version: u64) -> Self {
        let previous: HashMap<&BlockId, (usize, &Block)> = before
            .blocks
            .iter()
            .enumerate()
            .map(|(index, block)| (&block.id, (index, block)))
            .collect();

        let changed = after
            .blocks
            .iter()
            .enumerate()
            .filter(|(index, block)| match previous.get(&block.id) {
                Some((old_index, old_block)) => old_index != index || *old_block != *block,
                None => true,
            })
            .map(|(_, block)| block.id.clone())
            .collect();

        let removed = before
            .blocks
            .iter()
            .filter(|block| after.position(&block.id).is_none())
            .map(|block| block.id.clone())
            .collect();

        Self {
            changed,
            removed,
            settings_changed: before.global_styles != after.global_styles
                || before.settings != after.settings,
            version,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty() && !self.settings_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockType;

    #[test]
    fn test_identical_documents_produce_empty_patch() {
        let mut doc = Document::new();
        doc.blocks.push(Block::with_defaults(BlockType::Text));

        let patch = Patch::between(&doc, &doc.clone(), 1);

        assert!(patch.is_empty());
        assert_eq!(patch.version, 1);
    }

    #[test]
    fn test_swap_marks_both_blocks_changed() {
        let mut before = Document::new();
        before.blocks.push(Block::with_defaults(BlockType::Heading));
        before.blocks.push(Block::with_defaults(BlockType::Text));
        let mut after = before.clone();
        after.blocks.swap(0, 1);

        let patch = Patch::between(&before, &after, 2);

        assert_eq!(patch.changed, after.block_ids());
        assert!(patch.removed.is_empty());
    }

    #[test]
    fn test_removal_is_reported() {
        let mut before = Document::new();
        before.blocks.push(Block::with_defaults(BlockType::Divider));
        let after = Document::new();

        let patch = Patch::between(&before, &after, 3);

        assert_eq!(patch.removed, before.block_ids());
        assert!(patch.changed.is_empty());
    }
}
