//! Default payloads for each block type.
//!
//! New blocks start from these values. They are rebuilt on every call, so
//! callers own the returned data outright.

use super::{
    BlockContent, BlockType, ButtonContent, DividerContent, FooterContent, HeadingContent,
    ImageContent, SocialContent, SocialLink, SpacerContent, StyleValue, Styles, TextContent,
};
use crate::error::EngineError;

/// Initial content and styles for a freshly inserted block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDefaults {
    pub content: BlockContent,
    pub styles: Styles,
}

pub const DEFAULT_HEADING_TEXT: &str = "Your Heading";
pub const DEFAULT_TEXT: &str = "Add your text here. Click to edit this paragraph.";
pub const DEFAULT_FOOTER_TEXT: &str = "You are receiving this email because you subscribed to our mailing list. \
<a href=\"{{unsubscribeUrl}}\">Unsubscribe</a>";

pub fn defaults_for(kind: BlockType) -> BlockDefaults {
    match kind {
        BlockType::Text => BlockDefaults {
            content: BlockContent::Text(TextContent {
                text: DEFAULT_TEXT.to_string(),
            }),
            styles: styles([
                ("fontSize", StyleValue::Number(16.0)),
                ("color", "#333333".into()),
                ("lineHeight", StyleValue::Number(1.6)),
                ("textAlign", "left".into()),
                ("padding", "10px 20px".into()),
            ]),
        },
        BlockType::Heading => BlockDefaults {
            content: BlockContent::Heading(HeadingContent {
                text: DEFAULT_HEADING_TEXT.to_string(),
                level: 2,
            }),
            styles: styles([
                ("fontSize", StyleValue::Number(28.0)),
                ("fontWeight", "bold".into()),
                ("color", "#222222".into()),
                ("textAlign", "center".into()),
                ("padding", "10px 20px".into()),
            ]),
        },
        BlockType::Image => BlockDefaults {
            content: BlockContent::Image(ImageContent {
                src: "https://placehold.co/600x300".to_string(),
                alt: "Image".to_string(),
                width: "100%".to_string(),
                link: String::new(),
            }),
            styles: styles([("textAlign", "center".into()), ("padding", "10px 20px".into())]),
        },
        BlockType::Button => BlockDefaults {
            content: BlockContent::Button(ButtonContent {
                text: "Click Here".to_string(),
                url: "https://example.com".to_string(),
                align: "center".to_string(),
            }),
            styles: styles([
                ("backgroundColor", "#007bff".into()),
                ("color", "#ffffff".into()),
                ("padding", "12px 24px".into()),
                ("borderRadius", StyleValue::Number(4.0)),
                ("fontSize", StyleValue::Number(16.0)),
                ("fontWeight", "bold".into()),
                ("textDecoration", "none".into()),
                ("display", "inline-block".into()),
            ]),
        },
        BlockType::Divider => BlockDefaults {
            content: BlockContent::Divider(DividerContent {}),
            styles: styles([
                ("borderTop", "1px solid #dddddd".into()),
                ("margin", "20px 0".into()),
            ]),
        },
        BlockType::Spacer => BlockDefaults {
            content: BlockContent::Spacer(SpacerContent::default()),
            styles: Styles::new(),
        },
        BlockType::Social => BlockDefaults {
            content: BlockContent::Social(SocialContent {
                links: ["facebook", "twitter", "instagram"]
                    .into_iter()
                    .map(|platform| SocialLink {
                        platform: platform.to_string(),
                        url: format!("https://{platform}.com"),
                    })
                    .collect(),
                align: "center".to_string(),
            }),
            styles: styles([("padding", "10px 20px".into())]),
        },
        BlockType::Footer => BlockDefaults {
            content: BlockContent::Footer(FooterContent {
                text: DEFAULT_FOOTER_TEXT.to_string(),
                address: String::new(),
            }),
            styles: styles([
                ("fontSize", StyleValue::Number(12.0)),
                ("color", "#999999".into()),
                ("textAlign", "center".into()),
                ("padding", "20px".into()),
            ]),
        },
    }
}

/// Look up defaults by wire name
pub fn defaults_for_name(name: &str) -> Result<BlockDefaults, EngineError> {
    Ok(defaults_for(name.parse()?))
}

/// Content fields that must be non-empty for a block to be complete
pub fn required_fields(kind: BlockType) -> &'static [&'static str] {
    match kind {
        BlockType::Text | BlockType::Heading | BlockType::Footer => &["text"],
        BlockType::Image => &["src"],
        BlockType::Button => &["text", "url"],
        BlockType::Social => &["links"],
        BlockType::Divider | BlockType::Spacer => &[],
    }
}

fn styles<const N: usize>(pairs: [(&str, StyleValue); N]) -> Styles {
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_every_type_has_matching_defaults() {
        for kind in BlockType::ALL {
            let defaults = defaults_for(kind);
            assert_eq!(defaults.content.block_type(), Some(kind));
        }
    }

    #[test]
    fn test_heading_default_text() {
        let defaults = defaults_for(BlockType::Heading);
        assert_eq!(
            defaults.content,
            BlockContent::Heading(HeadingContent {
                text: "Your Heading".to_string(),
                level: 2,
            })
        );
    }

    #[test]
    fn test_footer_default_carries_unsubscribe_token() {
        let BlockContent::Footer(footer) = defaults_for(BlockType::Footer).content else {
            panic!("footer defaults should be footer content");
        };
        assert!(footer.text.contains("{{unsubscribeUrl}}"));
    }

    #[test]
    fn test_defaults_for_unknown_name() {
        assert!(matches!(
            defaults_for_name("video"),
            Err(EngineError::UnknownBlockType(name)) if name == "video"
        ));
    }

    #[rstest]
    #[case(BlockType::Image, &["src"])]
    #[case(BlockType::Button, &["text", "url"])]
    #[case(BlockType::Divider, &[])]
    fn test_required_fields(#[case] kind: BlockType, #[case] expected: &[&str]) {
        assert_eq!(required_fields(kind), expected);
    }

    #[test]
    fn test_defaults_satisfy_required_fields() {
        for kind in BlockType::ALL {
            let value = defaults_for(kind).content.to_value();
            for field in required_fields(kind) {
                let present = match &value[*field] {
                    serde_json::Value::String(s) => !s.is_empty(),
                    serde_json::Value::Array(items) => !items.is_empty(),
                    serde_json::Value::Null => false,
                    _ => true,
                };
                assert!(present, "{kind} default is missing {field}");
            }
        }
    }
}
