//! Document to HTML compilation.
//!
//! [`compile`] is pure and deterministic: the same document always yields
//! byte-identical output, and it never fails. Blocks it cannot render
//! contribute an empty fragment instead of aborting the document.

pub mod blocks;
pub mod css;

use html_escape::encode_text;

use crate::editing::document::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_CONTAINER_WIDTH, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE,
    DEFAULT_LINE_HEIGHT, DEFAULT_LINK_COLOR, DEFAULT_TEXT_COLOR,
};
use crate::editing::{Document, GlobalStyles, Settings};
pub use blocks::render_block;
pub use css::{serialize_styles, to_kebab_case};
use css::sanitize_value;

/// Viewport width below which the container collapses to full width
pub const MOBILE_BREAKPOINT: &str = "600px";

/// Compile a document into a complete, self-contained HTML email
pub fn compile(document: &Document) -> String {
    let mut html = String::with_capacity(2048 + document.len() * 256);
    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("<meta http-equiv=\"X-UA-Compatible\" content=\"IE=edge\">\n");
    html.push_str(&style_sheet(&document.global_styles));
    html.push_str("</head>\n<body>\n");
    html.push_str(&preheader(&document.settings));
    html.push_str("<div class=\"container\">\n");
    for fragment in render_fragments(document) {
        if !fragment.is_empty() {
            html.push_str(&fragment);
            html.push('\n');
        }
    }
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// One fragment per block, in block order; unknown blocks yield `""`
pub fn render_fragments(document: &Document) -> Vec<String> {
    document.blocks.iter().map(render_block).collect()
}

fn style_sheet(styles: &GlobalStyles) -> String {
    let background = sanitize_value(&styles.background_color, DEFAULT_BACKGROUND_COLOR);
    let font_family = sanitize_value(&styles.font_family, DEFAULT_FONT_FAMILY);
    let font_size = sanitize_value(&styles.font_size, DEFAULT_FONT_SIZE);
    let line_height = sanitize_value(&styles.line_height, DEFAULT_LINE_HEIGHT);
    let text_color = sanitize_value(&styles.text_color, DEFAULT_TEXT_COLOR);
    let link_color = sanitize_value(&styles.link_color, DEFAULT_LINK_COLOR);
    let width = sanitize_value(&styles.container_width, DEFAULT_CONTAINER_WIDTH);

    format!(
        "<style>\n\
body {{ margin: 0; padding: 0; background-color: {background}; font-family: {font_family}; font-size: {font_size}; line-height: {line_height}; color: {text_color}; }}\n\
a {{ color: {link_color}; }}\n\
img {{ border: 0; outline: none; text-decoration: none; }}\n\
.container {{ max-width: {width}; margin: 0 auto; }}\n\
@media (max-width: {MOBILE_BREAKPOINT}) {{\n\
.container {{ width: 100% !important; max-width: 100% !important; }}\n\
}}\n\
</style>\n"
    )
}

/// Hidden inbox preview text, or nothing when the preheader is blank
fn preheader(settings: &Settings) -> String {
    match settings.preheader.trim() {
        "" => String::new(),
        text => format!(
            "<div style=\"display: none; max-height: 0; height: 0; overflow: hidden; opacity: 0; mso-hide: all;\">{}</div>\n",
            encode_text(text)
        ),
    }
}
