/*!
 * # Editing Core Module
 *
 * The authoritative in-memory model of an email being edited.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: the Document
 * - A [`Document`] is an ordered `Vec` of typed blocks plus global styles and settings
 * - Block order is the render order; blocks carry no position field
 *
 * ### 2. Command-Based Editing
 * - All structural edits are expressible as [`Cmd`] values
 * - Commands run against a scratch copy, so a failing command never leaves a
 *   half-applied document behind
 *
 * ### 3. Snapshot History
 * - Every change pushes a full deep copy onto [`History`]
 * - A fresh edit after undo truncates the redo tail
 *
 * ### 4. Observers
 * - [`EditorSession`] owns one Document + History pair and notifies
 *   subscribers with a [`Patch`] after each change, undo and redo
 *
 * ## Usage Pattern
 *
 * ```rust
 * use mailblocks_engine::editing::{Direction, EditorSession};
 * use mailblocks_engine::BlockType;
 *
 * let mut session = EditorSession::new();
 * let heading = session.add_block(BlockType::Heading, None).unwrap();
 * let text = session.add_block(BlockType::Text, None).unwrap();
 * session.move_block(&text.id, Direction::Up).unwrap();
 *
 * let html = session.compile();
 * assert!(html.find("<p").unwrap() < html.find("<h2").unwrap());
 *
 * session.undo();
 * assert_eq!(session.document().blocks[0].id, heading.id);
 * ```
 */

pub mod commands;
pub mod document;
pub mod history;
pub mod patch;
pub mod session;

pub use commands::{Cmd, Direction};
pub use document::{Document, DocumentStructure, GlobalStyles, Settings, StructureSettings};
pub use history::History;
pub use patch::Patch;
pub use session::{EditorSession, SubscriptionId};
