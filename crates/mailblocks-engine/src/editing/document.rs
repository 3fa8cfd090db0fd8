use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::blocks::styles::{css_length, css_plain};
use crate::blocks::{Block, BlockId};

pub const DEFAULT_BACKGROUND_COLOR: &str = "#f4f4f4";
pub const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";
pub const DEFAULT_FONT_SIZE: &str = "16px";
pub const DEFAULT_LINE_HEIGHT: &str = "1.5";
pub const DEFAULT_TEXT_COLOR: &str = "#333333";
pub const DEFAULT_LINK_COLOR: &str = "#007bff";
pub const DEFAULT_CONTAINER_WIDTH: &str = "600px";

/// Document-wide styles applied to the wrapper, never to individual blocks.
///
/// On the wire these live flattened inside `settings`, with the container
/// width spelled `contentWidth`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalStyles {
    pub background_color: String,
    pub font_family: String,
    #[serde(deserialize_with = "css_length")]
    pub font_size: String,
    #[serde(deserialize_with = "css_plain")]
    pub line_height: String,
    pub text_color: String,
    pub link_color: String,
    #[serde(
        rename = "contentWidth",
        alias = "containerWidth",
        deserialize_with = "css_length"
    )]
    pub container_width: String,
}

impl Default for GlobalStyles {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE.to_string(),
            line_height: DEFAULT_LINE_HEIGHT.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            link_color: DEFAULT_LINK_COLOR.to_string(),
            container_width: DEFAULT_CONTAINER_WIDTH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Hidden inbox preview text; empty means none
    pub preheader: String,
}

/// An email document: blocks in render order plus document-wide settings.
///
/// Serializes to and from the persisted `{blocks, settings}` shape via
/// [`DocumentStructure`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "DocumentStructure", into = "DocumentStructure")]
pub struct Document {
    pub blocks: Vec<Block>,
    pub global_styles: GlobalStyles,
    pub settings: Settings,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_styles(global_styles: GlobalStyles) -> Self {
        Self {
            global_styles,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index of the block with `id` in render order
    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| &block.id == id)
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| &block.id == id)
    }

    pub fn block_ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|block| block.id.clone()).collect()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Persisted shape handed to the template store
    pub fn structure(&self) -> DocumentStructure {
        DocumentStructure::from(self.clone())
    }

    /// Give a fresh id to every block whose id already appeared earlier in
    /// render order. Returns how many blocks were re-identified.
    pub fn ensure_unique_ids(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut renamed = 0;
        for block in &mut self.blocks {
            if !seen.insert(block.id.clone()) {
                let fresh = BlockId::generate();
                log::debug!("duplicate block id {} renamed to {fresh}", block.id);
                block.id = fresh.clone();
                seen.insert(fresh);
                renamed += 1;
            }
        }
        renamed
    }
}

/// The persisted/exchanged document shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub settings: StructureSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureSettings {
    #[serde(flatten)]
    pub styles: GlobalStyles,
    #[serde(default)]
    pub preheader: String,
}

impl From<DocumentStructure> for Document {
    fn from(structure: DocumentStructure) -> Self {
        let mut document = Document {
            blocks: structure.blocks,
            global_styles: structure.settings.styles,
            settings: Settings {
                preheader: structure.settings.preheader,
            },
        };
        document.ensure_unique_ids();
        document
    }
}

impl From<Document> for DocumentStructure {
    fn from(document: Document) -> Self {
        DocumentStructure {
            blocks: document.blocks,
            settings: StructureSettings {
                styles: document.global_styles,
                preheader: document.settings.preheader,
            },
        }
    }
}
