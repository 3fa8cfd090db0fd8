pub mod blocks;
pub mod compiler;
pub mod editing;
pub mod error;
pub mod io;
pub mod lint;
pub mod save;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use blocks::registry::{BlockDefaults, defaults_for, defaults_for_name, required_fields};
pub use blocks::{Block, BlockContent, BlockId, BlockType, StyleValue, Styles};
pub use compiler::{compile, render_block};
pub use editing::{Cmd, Direction, Document, EditorSession, GlobalStyles, History, Patch};
pub use error::EngineError;
pub use lint::{LintIssue, lint};
pub use save::{
    TemplateId, TemplateMeta, TemplateRecord, TemplateStore, UNSUBSCRIBE_TOKEN, check_save_gate,
    save_template,
};
