use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::blocks::{Block, BlockType};
use crate::editing::Document;

/// Create a temporary directory for document files
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test file with content, relative to `dir`
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}

/// A document with one block of every type and a preheader
pub fn sample_document() -> Document {
    let mut doc = Document::new();
    for kind in BlockType::ALL {
        doc.blocks.push(Block::with_defaults(kind));
    }
    doc.settings.preheader = "A quick look inside".to_string();
    doc
}
