use crate::blocks::BlockId;

/// Errors raised synchronously by the document model, the registry and the save gate.
///
/// None of these are logged by the engine; callers decide how to surface them.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Invalid content for block {id}: {reason}")]
    InvalidContent { id: BlockId, reason: String },

    #[error("Document has no footer block with an unsubscribe link")]
    MissingUnsubscribeLink,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
