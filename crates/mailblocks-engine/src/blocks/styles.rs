use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A single CSS-like value as carried on the wire.
///
/// `Null` is kept distinct from a missing key: in a partial update it removes
/// the key, and the compiler never emits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Null,
    Number(f64),
    Text(String),
}

impl StyleValue {
    /// True for values the compiler omits entirely.
    pub fn is_blank(&self) -> bool {
        match self {
            StyleValue::Null => true,
            StyleValue::Number(n) => !n.is_finite(),
            StyleValue::Text(s) => s.trim().is_empty(),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<u32> for StyleValue {
    fn from(value: u32) -> Self {
        StyleValue::Number(f64::from(value))
    }
}

/// Flat map of camelCase property names to values.
///
/// Keys are kept sorted so that serialization order never depends on
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Styles(BTreeMap<String, StyleValue>);

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Shallow-merge a partial update. A `Null` in the partial removes the key.
    pub fn merge(&mut self, partial: &Styles) {
        for (key, value) in &partial.0 {
            match value {
                StyleValue::Null => {
                    self.0.remove(key);
                }
                other => {
                    self.0.insert(key.clone(), other.clone());
                }
            }
        }
    }

    /// Return `base` overlaid with these styles; keys present here win.
    pub fn layered_over(&self, base: &Styles) -> Styles {
        let mut layered = base.clone();
        for (key, value) in &self.0 {
            layered.0.insert(key.clone(), value.clone());
        }
        layered
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for Styles {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Styles(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Read a CSS length that may arrive as a bare number (pixels) or a string.
/// Null and absent values become an empty string so the compiler falls back
/// to its default.
pub(crate) fn css_length<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<StyleValue>::deserialize(deserializer)? {
        Some(StyleValue::Number(n)) if n.is_finite() => format!("{n}px"),
        Some(StyleValue::Text(s)) => s,
        _ => String::new(),
    })
}

/// Like [`css_length`] but numbers stay unitless (e.g. `lineHeight: 1.5`).
pub(crate) fn css_plain<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<StyleValue>::deserialize(deserializer)? {
        Some(StyleValue::Number(n)) if n.is_finite() => n.to_string(),
        Some(StyleValue::Text(s)) => s,
        _ => String::new(),
    })
}
