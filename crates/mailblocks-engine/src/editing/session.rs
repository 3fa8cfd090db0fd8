use std::fmt;

use serde_json::Value;

use crate::blocks::{Block, BlockId, BlockType, Styles};
use crate::compiler;
use crate::editing::commands::{self, Cmd, Direction};
use crate::editing::{Document, History, Patch};
use crate::error::EngineError;

/// Handle returned by [`EditorSession::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Patch)>;

/// One editing session: a document, its undo history, the current selection
/// and the observers bound to it.
///
/// Every successful structural change pushes exactly one history entry and
/// notifies observers with a [`Patch`]. Failed commands leave the document
/// and history untouched. No-op moves and reorders push nothing.
pub struct EditorSession {
    history: History,
    version: u64,
    selection: Option<BlockId>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::from_document(Document::new())
    }

    /// Start a session over a loaded document; it becomes the only history entry.
    /// Repeated block ids are replaced so every id addresses exactly one block.
    pub fn from_document(mut document: Document) -> Self {
        document.ensure_unique_ids();
        Self {
            history: History::new(document),
            version: 0,
            selection: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn document(&self) -> &Document {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Incremented on every change, including undo and redo
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply a command, recording it in history when it changes the document
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EngineError> {
        log::debug!("applying {cmd:?}");
        self.commit(|doc| {
            let changed = cmd.apply_to(doc)?;
            Ok(((), changed))
        })
        .map(|(_, patch)| patch)
    }

    pub fn add_block(
        &mut self,
        kind: BlockType,
        position: Option<usize>,
    ) -> Result<Block, EngineError> {
        self.commit(|doc| Ok((commands::insert_block(doc, kind, position), true)))
            .map(|(block, _)| block)
    }

    /// Like [`add_block`](Self::add_block) for a type given by its wire name
    pub fn add_block_named(
        &mut self,
        kind: &str,
        position: Option<usize>,
    ) -> Result<Block, EngineError> {
        self.add_block(kind.parse()?, position)
    }

    pub fn update_block(
        &mut self,
        id: &BlockId,
        content: Option<Value>,
        styles: Option<Styles>,
    ) -> Result<(), EngineError> {
        self.commit(|doc| {
            commands::update_block(doc, id, content.as_ref(), styles.as_ref())?;
            Ok(((), true))
        })
        .map(|_| ())
    }

    /// Remove a block and return it. Clears the selection if it pointed there.
    pub fn delete_block(&mut self, id: &BlockId) -> Result<Block, EngineError> {
        self.commit(|doc| Ok((commands::delete_block(doc, id)?, true)))
            .map(|(block, _)| block)
    }

    pub fn duplicate_block(&mut self, id: &BlockId) -> Result<Block, EngineError> {
        self.commit(|doc| Ok((commands::duplicate_block(doc, id)?, true)))
            .map(|(block, _)| block)
    }

    pub fn move_block(&mut self, id: &BlockId, direction: Direction) -> Result<(), EngineError> {
        self.commit(|doc| Ok(((), commands::move_block(doc, id, direction)?)))
            .map(|_| ())
    }

    /// Drop target for drag-and-drop
    pub fn reorder(&mut self, id: &BlockId, new_index: usize) -> Result<(), EngineError> {
        self.commit(|doc| Ok(((), commands::reorder_block(doc, id, new_index)?)))
            .map(|_| ())
    }

    /// Step back one history entry. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Patch> {
        let before = self.history.current().clone();
        if !self.history.undo() {
            return None;
        }
        log::debug!("undo to history entry {}", self.history.cursor());
        Some(self.after_step(&before))
    }

    /// Step forward one history entry. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<Patch> {
        let before = self.history.current().clone();
        if !self.history.redo() {
            return None;
        }
        log::debug!("redo to history entry {}", self.history.cursor());
        Some(self.after_step(&before))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn selected(&self) -> Option<&BlockId> {
        self.selection.as_ref()
    }

    /// Select a block, or clear the selection with `None`
    pub fn select(&mut self, id: Option<&BlockId>) -> Result<(), EngineError> {
        self.selection = match id {
            Some(id) if self.document().position(id).is_none() => {
                return Err(EngineError::BlockNotFound(id.clone()));
            }
            Some(id) => Some(id.clone()),
            None => None,
        };
        Ok(())
    }

    /// Register an observer called after every change, undo and redo
    pub fn subscribe(&mut self, listener: impl FnMut(&Patch) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Compile the current document to HTML
    pub fn compile(&self) -> String {
        compiler::compile(self.document())
    }

    /// Run `edit` against a scratch copy of the current document and, if it
    /// succeeds and reports a change, push the copy as a new history entry.
    fn commit<T>(
        &mut self,
        edit: impl FnOnce(&mut Document) -> Result<(T, bool), EngineError>,
    ) -> Result<(T, Patch), EngineError> {
        let mut next = self.history.current().clone();
        let (value, changed) = edit(&mut next)?;
        if !changed {
            return Ok((
                value,
                Patch {
                    version: self.version,
                    ..Patch::default()
                },
            ));
        }

        self.version += 1;
        let patch = Patch::between(self.history.current(), &next, self.version);
        self.history.push(next);
        self.publish(&patch);
        Ok((value, patch))
    }

    fn after_step(&mut self, before: &Document) -> Patch {
        self.version += 1;
        let patch = Patch::between(before, self.history.current(), self.version);
        self.publish(&patch);
        patch
    }

    fn publish(&mut self, patch: &Patch) {
        if let Some(selected) = &self.selection
            && self.history.current().position(selected).is_none()
        {
            self.selection = None;
        }
        for (_, listener) in &mut self.listeners {
            listener(patch);
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("history", &self.history)
            .field("version", &self.version)
            .field("selection", &self.selection)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
