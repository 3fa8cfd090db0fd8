//! Typed content blocks: the atomic units of an email document.
//!
//! A [`Block`] pairs a stable [`BlockId`] with a [`BlockContent`] variant and a
//! flat [`Styles`] map. The content variant determines the block's type; there
//! is no separate type field that could disagree with the payload.

pub mod registry;
pub mod styles;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::EngineError;
pub use styles::{StyleValue, Styles};

/// Stable identifier of a block within a document.
///
/// On the wire an id may be a string or a number; both are normalised to text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for BlockId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WireId {
            Text(String),
            Integer(i64),
            Float(f64),
        }

        Ok(match WireId::deserialize(deserializer)? {
            WireId::Text(s) => BlockId(s),
            WireId::Integer(n) => BlockId(n.to_string()),
            WireId::Float(n) => BlockId(n.to_string()),
        })
    }
}

/// The closed set of block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Text,
    Heading,
    Image,
    Button,
    Divider,
    Spacer,
    Social,
    Footer,
}

impl BlockType {
    pub const ALL: [BlockType; 8] = [
        BlockType::Text,
        BlockType::Heading,
        BlockType::Image,
        BlockType::Button,
        BlockType::Divider,
        BlockType::Spacer,
        BlockType::Social,
        BlockType::Footer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::Heading => "heading",
            BlockType::Image => "image",
            BlockType::Button => "button",
            BlockType::Divider => "divider",
            BlockType::Spacer => "spacer",
            BlockType::Social => "social",
            BlockType::Footer => "footer",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EngineError::UnknownBlockType(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeadingContent {
    pub text: String,
    /// Heading element level, 1..=6
    pub level: u8,
}

impl Default for HeadingContent {
    fn default() -> Self {
        Self {
            text: String::new(),
            level: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageContent {
    pub src: String,
    pub alt: String,
    #[serde(deserialize_with = "styles::css_length")]
    pub width: String,
    /// Optional click-through URL; empty means no anchor
    pub link: String,
}

impl Default for ImageContent {
    fn default() -> Self {
        Self {
            src: String::new(),
            alt: String::new(),
            width: "100%".to_string(),
            link: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ButtonContent {
    pub text: String,
    pub url: String,
    pub align: String,
}

impl Default for ButtonContent {
    fn default() -> Self {
        Self {
            text: String::new(),
            url: "#".to_string(),
            align: "center".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DividerContent {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpacerContent {
    /// Height in pixels
    #[serde(deserialize_with = "pixels")]
    pub height: u32,
}

impl SpacerContent {
    pub const DEFAULT_HEIGHT: u32 = 20;
}

impl Default for SpacerContent {
    fn default() -> Self {
        Self {
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SocialContent {
    pub links: Vec<SocialLink>,
    pub align: String,
}

impl Default for SocialContent {
    fn default() -> Self {
        Self {
            links: Vec::new(),
            align: "center".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FooterContent {
    pub text: String,
    /// Postal address line, plain text
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
}

/// Type-dependent payload of a block.
///
/// `Unknown` carries blocks whose type is outside the closed set, as found in
/// persisted documents. They survive loading and saving untouched and the
/// compiler renders nothing for them.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Text(TextContent),
    Heading(HeadingContent),
    Image(ImageContent),
    Button(ButtonContent),
    Divider(DividerContent),
    Spacer(SpacerContent),
    Social(SocialContent),
    Footer(FooterContent),
    Unknown { kind: String, raw: Value },
}

impl BlockContent {
    /// Decode a wire payload for the named type. Unknown type names are kept
    /// as [`BlockContent::Unknown`]; a known type with a malformed payload is
    /// an error.
    pub fn from_parts(kind: &str, raw: Value) -> Result<Self, serde_json::Error> {
        let Ok(block_type) = kind.parse::<BlockType>() else {
            return Ok(BlockContent::Unknown {
                kind: kind.to_string(),
                raw,
            });
        };

        // A missing payload means "all defaults"
        let raw = match raw {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        Ok(match block_type {
            BlockType::Text => BlockContent::Text(serde_json::from_value(raw)?),
            BlockType::Heading => BlockContent::Heading(serde_json::from_value(raw)?),
            BlockType::Image => BlockContent::Image(serde_json::from_value(raw)?),
            BlockType::Button => BlockContent::Button(serde_json::from_value(raw)?),
            BlockType::Divider => BlockContent::Divider(serde_json::from_value(raw)?),
            BlockType::Spacer => BlockContent::Spacer(serde_json::from_value(raw)?),
            BlockType::Social => BlockContent::Social(serde_json::from_value(raw)?),
            BlockType::Footer => BlockContent::Footer(serde_json::from_value(raw)?),
        })
    }

    /// Decode a persisted payload field by field. Fields that do not belong to
    /// the type, or do not decode, are dropped and the type's fallback is kept,
    /// so one odd field never costs the whole document.
    pub fn from_parts_lenient(kind: &str, raw: Value) -> Self {
        let Ok(block_type) = kind.parse::<BlockType>() else {
            return BlockContent::Unknown {
                kind: kind.to_string(),
                raw,
            };
        };

        let mut content = Self::fallback(block_type);
        if let Value::Object(fields) = raw {
            for (key, value) in fields {
                let single = Map::from_iter([(key, value)]);
                match content.merged(&single) {
                    Ok(merged) => content = merged,
                    Err(e) => log::debug!("dropping {kind} field: {e}"),
                }
            }
        }
        content
    }

    /// Content with every field at its serde fallback
    fn fallback(kind: BlockType) -> Self {
        match kind {
            BlockType::Text => BlockContent::Text(TextContent::default()),
            BlockType::Heading => BlockContent::Heading(HeadingContent::default()),
            BlockType::Image => BlockContent::Image(ImageContent::default()),
            BlockType::Button => BlockContent::Button(ButtonContent::default()),
            BlockType::Divider => BlockContent::Divider(DividerContent::default()),
            BlockType::Spacer => BlockContent::Spacer(SpacerContent::default()),
            BlockType::Social => BlockContent::Social(SocialContent::default()),
            BlockType::Footer => BlockContent::Footer(FooterContent::default()),
        }
    }

    pub fn block_type(&self) -> Option<BlockType> {
        match self {
            BlockContent::Text(_) => Some(BlockType::Text),
            BlockContent::Heading(_) => Some(BlockType::Heading),
            BlockContent::Image(_) => Some(BlockType::Image),
            BlockContent::Button(_) => Some(BlockType::Button),
            BlockContent::Divider(_) => Some(BlockType::Divider),
            BlockContent::Spacer(_) => Some(BlockType::Spacer),
            BlockContent::Social(_) => Some(BlockType::Social),
            BlockContent::Footer(_) => Some(BlockType::Footer),
            BlockContent::Unknown { .. } => None,
        }
    }

    /// Type name as written on the wire
    pub fn type_name(&self) -> &str {
        match self {
            BlockContent::Unknown { kind, .. } => kind,
            known => known.block_type().map(BlockType::as_str).unwrap_or_default(),
        }
    }

    /// Encode the payload as a JSON value in wire shape
    pub fn to_value(&self) -> Value {
        let encoded = match self {
            BlockContent::Text(c) => serde_json::to_value(c),
            BlockContent::Heading(c) => serde_json::to_value(c),
            BlockContent::Image(c) => serde_json::to_value(c),
            BlockContent::Button(c) => serde_json::to_value(c),
            BlockContent::Divider(c) => serde_json::to_value(c),
            BlockContent::Spacer(c) => serde_json::to_value(c),
            BlockContent::Social(c) => serde_json::to_value(c),
            BlockContent::Footer(c) => serde_json::to_value(c),
            BlockContent::Unknown { raw, .. } => return raw.clone(),
        };
        // Plain structs of strings and numbers always encode
        encoded.unwrap_or(Value::Null)
    }

    /// Shallow-merge `partial` into this payload, producing a new payload.
    ///
    /// Fields the type does not have, or values of the wrong shape, are
    /// rejected and leave `self` untouched.
    pub fn merged(&self, partial: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut fields = match self.to_value() {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        for (key, value) in partial {
            fields.insert(key.clone(), value.clone());
        }
        Self::from_parts(self.type_name(), Value::Object(fields))
    }
}

/// A single typed content unit within a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireBlock", into = "WireBlock")]
pub struct Block {
    pub id: BlockId,
    pub content: BlockContent,
    pub styles: Styles,
}

impl Block {
    /// Create a block of the given type initialised from the registry defaults
    pub fn with_defaults(kind: BlockType) -> Self {
        let defaults = registry::defaults_for(kind);
        Self {
            id: BlockId::generate(),
            content: defaults.content,
            styles: defaults.styles,
        }
    }

    pub fn kind(&self) -> Option<BlockType> {
        self.content.block_type()
    }

    /// Deep copy with a fresh id
    pub fn duplicate(&self) -> Self {
        Self {
            id: BlockId::generate(),
            content: self.content.clone(),
            styles: self.styles.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct WireBlock {
    id: BlockId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    styles: Styles,
}

impl From<WireBlock> for Block {
    fn from(wire: WireBlock) -> Self {
        Block {
            id: wire.id,
            content: BlockContent::from_parts_lenient(&wire.kind, wire.content),
            styles: wire.styles,
        }
    }
}

impl From<Block> for WireBlock {
    fn from(block: Block) -> Self {
        WireBlock {
            id: block.id,
            kind: block.content.type_name().to_string(),
            content: block.content.to_value(),
            styles: block.styles,
        }
    }
}

/// Read a pixel count from a number or a string such as `"24px"`.
/// Anything unreadable falls back to the spacer default.
fn pixels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let parsed = match Option::<StyleValue>::deserialize(deserializer)? {
        Some(StyleValue::Number(n)) => Some(n),
        Some(StyleValue::Text(s)) => s.trim().trim_end_matches("px").trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.round() as u32)
        .unwrap_or(SpacerContent::DEFAULT_HEIGHT))
}
