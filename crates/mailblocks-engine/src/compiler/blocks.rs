//! Per-block HTML fragments.
//!
//! Each renderer layers the block's own styles over a small set of
//! email-safe base styles, so a block with an empty styles map still renders
//! sensibly. Attribute values and plain labels are escaped; rich-text bodies
//! (text, heading, footer) are editor-produced inline HTML and emitted as-is.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::css::serialize_styles;
use crate::blocks::{
    Block, BlockContent, ButtonContent, FooterContent, HeadingContent, ImageContent,
    SocialContent, SpacerContent, StyleValue, Styles, TextContent,
};

/// Render one block. Unknown block types render as an empty string.
pub fn render_block(block: &Block) -> String {
    match &block.content {
        BlockContent::Text(content) => render_text(content, &block.styles),
        BlockContent::Heading(content) => render_heading(content, &block.styles),
        BlockContent::Image(content) => render_image(content, &block.styles),
        BlockContent::Button(content) => render_button(content, &block.styles),
        BlockContent::Divider(_) => render_divider(&block.styles),
        BlockContent::Spacer(content) => render_spacer(content, &block.styles),
        BlockContent::Social(content) => render_social(content, &block.styles),
        BlockContent::Footer(content) => render_footer(content, &block.styles),
        BlockContent::Unknown { .. } => String::new(),
    }
}

fn render_text(content: &TextContent, styles: &Styles) -> String {
    let style = style_attr(&base([("margin", "0")]), styles);
    format!("<p{style}>{}</p>", content.text)
}

fn render_heading(content: &HeadingContent, styles: &Styles) -> String {
    let level = content.level.clamp(1, 6);
    let style = style_attr(&base([("margin", "0")]), styles);
    format!("<h{level}{style}>{}</h{level}>", content.text)
}

fn render_image(content: &ImageContent, styles: &Styles) -> String {
    let width = non_empty(&content.width, "100%");
    let mut img_styles = base([
        ("maxWidth", "100%"),
        ("height", "auto"),
        ("border", "0"),
        ("display", "inline-block"),
    ]);
    img_styles.set("width", width);

    let img = format!(
        "<img src=\"{}\" alt=\"{}\" style=\"{}\">",
        encode_double_quoted_attribute(&content.src),
        encode_double_quoted_attribute(&content.alt),
        encode_double_quoted_attribute(&serialize_styles(&img_styles)),
    );
    let inner = match content.link.trim() {
        "" => img,
        link => format!(
            "<a href=\"{}\" target=\"_blank\">{img}</a>",
            encode_double_quoted_attribute(link)
        ),
    };

    let style = style_attr(&base([("textAlign", "center")]), styles);
    format!("<div{style}>{inner}</div>")
}

fn render_button(content: &ButtonContent, styles: &Styles) -> String {
    let wrapper = format!(
        " style=\"text-align: {}; padding: 10px 0;\"",
        encode_double_quoted_attribute(non_empty(&content.align, "center"))
    );
    let style = style_attr(
        &base([
            ("display", "inline-block"),
            ("padding", "12px 24px"),
            ("backgroundColor", "#007bff"),
            ("color", "#ffffff"),
            ("textDecoration", "none"),
            ("borderRadius", "4px"),
        ]),
        styles,
    );
    format!(
        "<div{wrapper}><a href=\"{}\" target=\"_blank\"{style}>{}</a></div>",
        encode_double_quoted_attribute(non_empty(&content.url, "#")),
        encode_text(&content.text),
    )
}

fn render_divider(styles: &Styles) -> String {
    let style = style_attr(
        &base([
            ("border", "none"),
            ("borderTop", "1px solid #dddddd"),
            ("margin", "20px 0"),
        ]),
        styles,
    );
    format!("<hr{style}>")
}

fn render_spacer(content: &SpacerContent, styles: &Styles) -> String {
    // The content height wins over any height in the styles map
    let mut layered = styles.clone();
    layered.set("height", format!("{}px", content.height));
    let style = style_attr(&Styles::new(), &layered);
    format!("<div{style}></div>")
}

fn render_social(content: &SocialContent, styles: &Styles) -> String {
    let links: String = content
        .links
        .iter()
        .filter(|link| !link.url.trim().is_empty())
        .map(|link| {
            format!(
                "<a href=\"{}\" target=\"_blank\" style=\"display: inline-block; margin: 0 8px; text-decoration: none;\">{}</a>",
                encode_double_quoted_attribute(link.url.trim()),
                encode_text(&link.platform),
            )
        })
        .collect();

    let mut base_styles = base([]);
    base_styles.set("textAlign", non_empty(&content.align, "center"));
    let style = style_attr(&base_styles, styles);
    format!("<div{style}>{links}</div>")
}

fn render_footer(content: &FooterContent, styles: &Styles) -> String {
    let address = match content.address.trim() {
        "" => String::new(),
        address => format!(
            "<p style=\"margin: 8px 0 0 0;\">{}</p>",
            encode_text(address)
        ),
    };
    let style = style_attr(
        &base([
            ("fontSize", "12px"),
            ("color", "#999999"),
            ("textAlign", "center"),
            ("padding", "20px"),
        ]),
        styles,
    );
    format!("<div{style}>{}{address}</div>", content.text)
}

fn base<const N: usize>(pairs: [(&str, &str); N]) -> Styles {
    pairs
        .into_iter()
        .map(|(key, value)| (key, StyleValue::from(value)))
        .collect()
}

/// ` style="..."` for `own` layered over `base`, or nothing when empty
fn style_attr(base: &Styles, own: &Styles) -> String {
    let css = serialize_styles(&own.layered_over(base));
    if css.is_empty() {
        String::new()
    } else {
        format!(" style=\"{}\"", encode_double_quoted_attribute(&css))
    }
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    match value.trim() {
        "" => fallback,
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{BlockId, BlockType, DividerContent, SocialLink};
    use insta::assert_snapshot;
    use serde_json::json;

    fn block(content: BlockContent, styles: Styles) -> Block {
        Block {
            id: BlockId::from("b"),
            content,
            styles,
        }
    }

    #[test]
    fn test_text_fragment() {
        let html = render_block(&block(
            BlockContent::Text(TextContent {
                text: "Hello <b>world</b>".to_string(),
            }),
            [("fontSize", StyleValue::Number(16.0))].into_iter().collect(),
        ));

        assert_snapshot!(html, @r#"<p style="font-size: 16px; margin: 0;">Hello <b>world</b></p>"#);
    }

    #[test]
    fn test_heading_level_is_clamped() {
        let html = render_block(&block(
            BlockContent::Heading(HeadingContent {
                text: "Title".to_string(),
                level: 9,
            }),
            Styles::new(),
        ));

        assert_snapshot!(html, @r#"<h6 style="margin: 0;">Title</h6>"#);
    }

    #[test]
    fn test_image_without_link() {
        let html = render_block(&block(
            BlockContent::Image(ImageContent {
                src: "https://cdn.example/a.png".to_string(),
                alt: "A \"quoted\" alt".to_string(),
                width: String::new(),
                link: String::new(),
            }),
            Styles::new(),
        ));

        assert!(!html.contains("<a "));
        assert!(html.contains("alt=\"A &quot;quoted&quot; alt\""));
        assert!(html.contains("width: 100%;"));
    }

    #[test]
    fn test_image_with_link_is_wrapped_in_anchor() {
        let html = render_block(&block(
            BlockContent::Image(ImageContent {
                src: "a.png".to_string(),
                alt: String::new(),
                width: "300px".to_string(),
                link: "https://example.com/?a=1&b=2".to_string(),
            }),
            Styles::new(),
        ));

        assert!(html.starts_with("<div style=\"text-align: center;\"><a href=\"https://example.com/?a=1&amp;b=2\""));
        assert!(html.contains("width: 300px;"));
        assert!(html.ends_with("</a></div>"));
    }

    #[test]
    fn test_button_fragment() {
        let html = render_block(&block(
            BlockContent::Button(ButtonContent {
                text: "Shop <now>".to_string(),
                url: String::new(),
                align: String::new(),
            }),
            [("backgroundColor", StyleValue::from("#ff6600"))]
                .into_iter()
                .collect(),
        ));

        assert_snapshot!(html, @r##"<div style="text-align: center; padding: 10px 0;"><a href="#" target="_blank" style="background-color: #ff6600; border-radius: 4px; color: #ffffff; display: inline-block; padding: 12px 24px; text-decoration: none;">Shop &lt;now&gt;</a></div>"##);
    }

    #[test]
    fn test_divider_fragment() {
        let html = render_block(&block(BlockContent::Divider(DividerContent {}), Styles::new()));

        assert_snapshot!(html, @r#"<hr style="border: none; border-top: 1px solid #dddddd; margin: 20px 0;">"#);
    }

    #[test]
    fn test_spacer_uses_content_height() {
        let html = render_block(&block(
            BlockContent::Spacer(SpacerContent { height: 32 }),
            [("height", StyleValue::from("5px"))].into_iter().collect(),
        ));

        assert_snapshot!(html, @r#"<div style="height: 32px;"></div>"#);
    }

    #[test]
    fn test_social_skips_links_without_url() {
        let html = render_block(&block(
            BlockContent::Social(SocialContent {
                links: vec![
                    SocialLink {
                        platform: "Mastodon".to_string(),
                        url: "https://mastodon.social/@shop".to_string(),
                    },
                    SocialLink {
                        platform: "Empty".to_string(),
                        url: " ".to_string(),
                    },
                ],
                align: "left".to_string(),
            }),
            Styles::new(),
        ));

        assert!(html.starts_with("<div style=\"text-align: left;\">"));
        assert!(html.contains(">Mastodon</a>"));
        assert!(!html.contains("Empty"));
    }

    #[test]
    fn test_footer_with_address() {
        let html = render_block(&block(
            BlockContent::Footer(FooterContent {
                text: "<a href=\"{{unsubscribeUrl}}\">Unsubscribe</a>".to_string(),
                address: "1 Main St & Co".to_string(),
            }),
            Styles::new(),
        ));

        assert!(html.contains("<a href=\"{{unsubscribeUrl}}\">Unsubscribe</a>"));
        assert!(html.contains("<p style=\"margin: 8px 0 0 0;\">1 Main St &amp; Co</p>"));
    }

    #[test]
    fn test_block_style_values_cannot_add_declarations() {
        let html = render_block(&block(
            BlockContent::Text(TextContent {
                text: "Hi".to_string(),
            }),
            [("color", StyleValue::from("red; position: fixed"))]
                .into_iter()
                .collect(),
        ));

        assert_snapshot!(html, @r#"<p style="color: red position: fixed; margin: 0;">Hi</p>"#);
    }

    #[test]
    fn test_unknown_block_renders_nothing() {
        let html = render_block(&block(
            BlockContent::Unknown {
                kind: "carousel".to_string(),
                raw: json!({"slides": []}),
            },
            Styles::new(),
        ));

        assert_eq!(html, "");
    }

    #[test]
    fn test_registry_defaults_render() {
        for kind in BlockType::ALL {
            let html = render_block(&Block::with_defaults(kind));
            assert!(!html.is_empty(), "{kind} rendered nothing");
        }
    }
}
