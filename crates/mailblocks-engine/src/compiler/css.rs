use std::sync::OnceLock;

use regex::Regex;

use crate::blocks::{StyleValue, Styles};

/// `fontSize` -> `font-size`. Names already in kebab-case pass through.
///
/// Every capital starts a new segment, so vendor keys keep their leading
/// hyphen: `WebkitTextSizeAdjust` -> `-webkit-text-size-adjust`. Lowercase
/// `ms` is the one vendor prefix written without a capital.
pub fn to_kebab_case(name: &str) -> String {
    static CAPITAL: OnceLock<Regex> = OnceLock::new();
    let capital = CAPITAL.get_or_init(|| Regex::new(r"[A-Z]").expect("Invalid capital regex"));
    let kebab = capital.replace_all(name, "-$0").to_lowercase();
    if kebab.starts_with("ms-") {
        format!("-{kebab}")
    } else {
        kebab
    }
}

/// Properties whose numeric values take no unit
fn is_unitless(property: &str) -> bool {
    property.contains("color")
        || matches!(
            property,
            "opacity"
                | "font-weight"
                | "line-height"
                | "z-index"
                | "flex"
                | "flex-grow"
                | "flex-shrink"
                | "order"
        )
}

/// Format one value for `property` (already kebab-cased). Blank values yield `None`.
pub fn format_value(property: &str, value: &StyleValue) -> Option<String> {
    if value.is_blank() {
        return None;
    }
    match value {
        StyleValue::Text(text) => {
            let cleaned = strip_breakers(text);
            let cleaned = cleaned.trim();
            (!cleaned.is_empty()).then(|| cleaned.to_string())
        }
        StyleValue::Number(n) if is_unitless(property) => Some(n.to_string()),
        StyleValue::Number(n) => Some(format!("{n}px")),
        StyleValue::Null => None,
    }
}

/// Serialize a styles map as `key: value;` pairs separated by single spaces
pub fn serialize_styles(styles: &Styles) -> String {
    styles
        .iter()
        .filter_map(|(key, value)| {
            let property = to_kebab_case(key);
            format_value(&property, value).map(|value| format!("{property}: {value};"))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop characters that could end a declaration or the `<style>` element
fn strip_breakers(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '{' | '}' | ';'))
        .collect()
}

/// Like [`strip_breakers`], falling back when nothing usable is left
pub(crate) fn sanitize_value(value: &str, fallback: &str) -> String {
    let cleaned = strip_breakers(value);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use rstest::rstest;
    use std::collections::BTreeSet;

    #[rstest]
    #[case("fontSize", "font-size")]
    #[case("backgroundColor", "background-color")]
    #[case("borderTopLeftRadius", "border-top-left-radius")]
    #[case("padding", "padding")]
    #[case("text-align", "text-align")]
    #[case("msoLineHeightRule", "mso-line-height-rule")]
    #[case("WebkitTextSizeAdjust", "-webkit-text-size-adjust")]
    #[case("MozBorderRadius", "-moz-border-radius")]
    #[case("msTransform", "-ms-transform")]
    #[case("-webkit-text-size-adjust", "-webkit-text-size-adjust")]
    fn test_kebab_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_kebab_case(input), expected);
    }

    #[rstest]
    #[case("font-size", StyleValue::Number(16.0), Some("16px"))]
    #[case("line-height", StyleValue::Number(1.5), Some("1.5"))]
    #[case("font-weight", StyleValue::Number(700.0), Some("700"))]
    #[case("opacity", StyleValue::Number(0.0), Some("0"))]
    #[case("background-color", StyleValue::Number(0.0), Some("0"))]
    #[case("padding", StyleValue::from(" 10px 20px "), Some("10px 20px"))]
    #[case("color", StyleValue::from(""), None)]
    #[case("color", StyleValue::from("red; position:fixed"), Some("red position:fixed"))]
    #[case("background", StyleValue::from("};</style>"), Some("/style"))]
    #[case("margin", StyleValue::from(";"), None)]
    #[case("color", StyleValue::Null, None)]
    fn test_format_value(
        #[case] property: &str,
        #[case] value: StyleValue,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(format_value(property, &value).as_deref(), expected);
    }

    #[test]
    fn test_serialize_styles() {
        let styles: Styles = [
            ("fontSize", StyleValue::Number(14.0)),
            ("color", StyleValue::from("#333")),
            ("lineHeight", StyleValue::Number(1.4)),
            ("border", StyleValue::Null),
            ("margin", StyleValue::from("")),
        ]
        .into_iter()
        .collect();

        assert_snapshot!(serialize_styles(&styles), @"color: #333; font-size: 14px; line-height: 1.4;");
    }

    #[test]
    fn test_serialize_empty_styles() {
        assert_eq!(serialize_styles(&Styles::new()), "");
    }

    #[test]
    fn test_serialized_keys_reparse_to_kebab_set() {
        let styles: Styles = [
            ("backgroundColor", StyleValue::from("#fff")),
            ("paddingTop", StyleValue::Number(8.0)),
            ("textAlign", StyleValue::from("center")),
            ("fontWeight", StyleValue::from("bold")),
        ]
        .into_iter()
        .collect();

        let serialized = serialize_styles(&styles);
        let reparsed: BTreeSet<String> = serialized
            .split(';')
            .filter(|pair| !pair.trim().is_empty())
            .filter_map(|pair| pair.split(':').next())
            .map(|key| key.trim().to_string())
            .collect();
        let expected: BTreeSet<String> = styles.iter().map(|(k, _)| to_kebab_case(k)).collect();

        assert_eq!(reparsed, expected);
    }

    #[rstest]
    #[case("#fff", "#000", "#fff")]
    #[case("</style><script>", "#000", "/stylescript")]
    #[case("  ", "600px", "600px")]
    fn test_sanitize_value(#[case] value: &str, #[case] fallback: &str, #[case] expected: &str) {
        assert_eq!(sanitize_value(value, fallback), expected);
    }
}
