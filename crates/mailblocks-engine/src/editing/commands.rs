use serde_json::Value;

use crate::blocks::{Block, BlockId, BlockType, Styles};
use crate::editing::{Document, GlobalStyles};
use crate::error::EngineError;

/// Direction for [`Cmd::MoveBlock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Structural edits that can be applied to a document
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    AddBlock {
        kind: BlockType,
        /// Insertion index; `None` appends
        position: Option<usize>,
    },
    UpdateBlock {
        id: BlockId,
        /// Partial content object, shallow-merged
        content: Option<Value>,
        /// Partial styles, shallow-merged; `null` values remove keys
        styles: Option<Styles>,
    },
    DeleteBlock {
        id: BlockId,
    },
    DuplicateBlock {
        id: BlockId,
    },
    MoveBlock {
        id: BlockId,
        direction: Direction,
    },
    Reorder {
        id: BlockId,
        new_index: usize,
    },
    SetGlobalStyles {
        styles: GlobalStyles,
    },
    SetPreheader {
        text: String,
    },
}

impl Cmd {
    /// Apply to `doc` in place. Returns whether the document changed.
    ///
    /// On error `doc` may be partially modified; callers apply commands to a
    /// scratch copy.
    pub(crate) fn apply_to(self, doc: &mut Document) -> Result<bool, EngineError> {
        match self {
            Cmd::AddBlock { kind, position } => {
                insert_block(doc, kind, position);
                Ok(true)
            }
            Cmd::UpdateBlock {
                id,
                content,
                styles,
            } => update_block(doc, &id, content.as_ref(), styles.as_ref()).map(|()| true),
            Cmd::DeleteBlock { id } => delete_block(doc, &id).map(|_| true),
            Cmd::DuplicateBlock { id } => duplicate_block(doc, &id).map(|_| true),
            Cmd::MoveBlock { id, direction } => move_block(doc, &id, direction),
            Cmd::Reorder { id, new_index } => reorder_block(doc, &id, new_index),
            Cmd::SetGlobalStyles { styles } => {
                let changed = doc.global_styles != styles;
                doc.global_styles = styles;
                Ok(changed)
            }
            Cmd::SetPreheader { text } => {
                let changed = doc.settings.preheader != text;
                doc.settings.preheader = text;
                Ok(changed)
            }
        }
    }
}

/// Insert a new block with registry defaults. `position` is clamped to the
/// end of the document.
pub(crate) fn insert_block(doc: &mut Document, kind: BlockType, position: Option<usize>) -> Block {
    let block = Block::with_defaults(kind);
    let index = position.unwrap_or(doc.len()).min(doc.len());
    doc.blocks.insert(index, block.clone());
    block
}

pub(crate) fn update_block(
    doc: &mut Document,
    id: &BlockId,
    content: Option<&Value>,
    styles: Option<&Styles>,
) -> Result<(), EngineError> {
    let index = locate(doc, id)?;
    let block = &mut doc.blocks[index];

    if let Some(partial) = content {
        let Value::Object(fields) = partial else {
            return Err(EngineError::InvalidContent {
                id: id.clone(),
                reason: "partial content must be an object".to_string(),
            });
        };
        block.content = block
            .content
            .merged(fields)
            .map_err(|e| EngineError::InvalidContent {
                id: id.clone(),
                reason: e.to_string(),
            })?;
    }

    if let Some(partial) = styles {
        block.styles.merge(partial);
    }

    Ok(())
}

pub(crate) fn delete_block(doc: &mut Document, id: &BlockId) -> Result<Block, EngineError> {
    let index = locate(doc, id)?;
    Ok(doc.blocks.remove(index))
}

/// Deep-copy a block and insert the copy directly after its source
pub(crate) fn duplicate_block(doc: &mut Document, id: &BlockId) -> Result<Block, EngineError> {
    let index = locate(doc, id)?;
    let copy = doc.blocks[index].duplicate();
    doc.blocks.insert(index + 1, copy.clone());
    Ok(copy)
}

/// Swap with the neighbour. Moving past either end is a no-op.
pub(crate) fn move_block(
    doc: &mut Document,
    id: &BlockId,
    direction: Direction,
) -> Result<bool, EngineError> {
    let index = locate(doc, id)?;
    let target = match direction {
        Direction::Up if index > 0 => index - 1,
        Direction::Down if index + 1 < doc.len() => index + 1,
        _ => return Ok(false),
    };
    doc.blocks.swap(index, target);
    Ok(true)
}

/// Remove and reinsert at `new_index`, clamped to the last position
pub(crate) fn reorder_block(
    doc: &mut Document,
    id: &BlockId,
    new_index: usize,
) -> Result<bool, EngineError> {
    let index = locate(doc, id)?;
    let target = new_index.min(doc.len() - 1);
    if target == index {
        return Ok(false);
    }
    let block = doc.blocks.remove(index);
    doc.blocks.insert(target, block);
    Ok(true)
}

fn locate(doc: &Document, id: &BlockId) -> Result<usize, EngineError> {
    doc.position(id)
        .ok_or_else(|| EngineError::BlockNotFound(id.clone()))
}
