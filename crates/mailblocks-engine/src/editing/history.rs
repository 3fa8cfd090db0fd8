use crate::editing::Document;

/// Linear undo/redo stack of full document snapshots.
///
/// `entries[cursor]` is the active document. Pushing truncates everything
/// after the cursor, so a fresh edit after an undo discards the redo tail.
/// Entries are owned deep copies and never share mutable state.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: Vec<Document>,
    cursor: usize,
}

impl History {
    pub fn new(initial: Document) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &Document {
        &self.entries[self.cursor]
    }

    pub fn push(&mut self, document: Document) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(document);
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry. Returns false at the oldest entry.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one entry. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a history holds at least its initial entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Block, BlockType};

    fn doc_with(count: usize) -> Document {
        let mut doc = Document::new();
        for _ in 0..count {
            doc.blocks.push(Block::with_defaults(BlockType::Text));
        }
        doc
    }

    #[test]
    fn test_initial_state_has_no_undo_or_redo() {
        let history = History::default();

        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_and_redo_are_noops_at_boundaries() {
        let mut history = History::default();

        assert!(!history.undo());
        assert!(!history.redo());
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_push_after_undo_discards_redo_tail() {
        let mut history = History::new(doc_with(0));
        history.push(doc_with(1));
        history.push(doc_with(2));

        assert!(history.undo());
        assert!(history.can_redo());

        history.push(doc_with(3));

        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().len(), 3);
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = History::new(doc_with(0));
        history.push(doc_with(1));

        assert!(history.undo());
        assert!(history.current().is_empty());
        assert!(history.redo());
        assert_eq!(history.current().len(), 1);
    }
}
