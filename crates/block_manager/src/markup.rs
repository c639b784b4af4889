//! Markup generation for block content.
//!
//! Attribute values are written with two quoting conventions so the host parser
//! can tell them apart: primitives go in double quotes, structured values
//! (sequences and maps) are JSON-encoded inside single quotes.
//!
//! ```text
//! class="gjs-cell" data-gjs-unstylable='["width"]'
//! ```

use canvas_types::{is_structured, to_dom_string, AttrMap, AttrValue};

use crate::definition::PlacementConstraints;

/// Serialize an attribute map for insertion into an opening tag.
///
/// The result starts with a space when non-empty, so it can be placed directly
/// after the tag name. Entries keep the map's insertion order.
pub fn attrs_to_string(attributes: &AttrMap) -> String {
    let mut out = String::new();
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(&attr_to_string(key, value));
    }
    out
}

fn attr_to_string(key: &str, value: &AttrValue) -> String {
    if is_structured(value) {
        format!("{}='{}'", key, value.to_string().replace('&', "&amp;").replace('\'', "&#39;"))
    } else {
        format!("{}=\"{}\"", key, to_dom_string(value).replace('&', "&amp;").replace('"', "&quot;"))
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// An element of generated block markup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub tag: String,
    pub attributes: AttrMap,
    pub children: Vec<Fragment>,
    pub text: Option<String>,
}

impl Fragment {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Write placement constraints as root attributes, verbatim
    pub fn with_constraints(mut self, constraints: &PlacementConstraints) -> Self {
        for (key, value) in constraints.to_attributes() {
            self.attributes.insert(key, value);
        }
        self
    }

    pub fn with_child(mut self, child: Fragment) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Class names used anywhere in this fragment, in document order
    pub fn classes(&self) -> Vec<String> {
        let mut classes = Vec::new();
        self.collect_classes(&mut classes);
        classes
    }

    fn collect_classes(&self, out: &mut Vec<String>) {
        if let Some(class) = self.attributes.get("class") {
            for name in to_dom_string(class).split_whitespace() {
                if !out.iter().any(|c| c == name) {
                    out.push(name.to_string());
                }
            }
        }
        for child in &self.children {
            child.collect_classes(out);
        }
    }

    pub fn to_markup(&self) -> String {
        let mut out = format!("<{}{}>", self.tag, attrs_to_string(&self.attributes));
        if let Some(text) = &self.text {
            out.push_str(&escape_text(text));
        }
        for child in &self.children {
            out.push_str(&child.to_markup());
        }
        out.push_str(&format!("</{}>", self.tag));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: AttrValue) -> AttrMap {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_structured_and_primitive_quoting() {
        let attrs = map(json!({
            "class": "gjs-cell",
            "data-gjs-unstylable": ["width"],
            "data-gjs-flags": {"a": 1}
        }));
        assert_eq!(
            attrs_to_string(&attrs),
            r#" class="gjs-cell" data-gjs-unstylable='["width"]' data-gjs-flags='{"a":1}'"#
        );
    }

    #[test]
    fn test_empty_map_serializes_to_nothing() {
        assert_eq!(attrs_to_string(&AttrMap::new()), "");
    }

    #[test]
    fn test_quotes_are_escaped() {
        let attrs = map(json!({"title": "say \"hi\"", "data": ["it's"], "on": true}));
        assert_eq!(
            attrs_to_string(&attrs),
            r#" title="say &quot;hi&quot;" data='["it&#39;s"]' on="true""#
        );
    }

    #[test]
    fn test_ampersands_are_escaped_first() {
        let quote = attrs_to_string(&map(json!({"title": "\""})));
        let entity = attrs_to_string(&map(json!({"title": "&quot;"})));
        assert_ne!(quote, entity);
        assert_eq!(entity, r#" title="&amp;quot;""#);

        let attrs = map(json!({"href": "?a=1&b=2", "data": ["&#39;", "'"]}));
        assert_eq!(
            attrs_to_string(&attrs),
            r#" href="?a=1&amp;b=2" data='["&amp;#39;","&#39;"]'"#
        );
    }

    #[test]
    fn test_fragment_markup_and_classes() {
        let fragment = Fragment::new("div")
            .with_attribute("class", "row main")
            .with_child(Fragment::new("div").with_attribute("class", "cell"))
            .with_child(Fragment::new("div").with_attribute("class", "cell").with_text("a < b"));

        assert_eq!(
            fragment.to_markup(),
            r#"<div class="row main"><div class="cell"></div><div class="cell">a &lt; b</div></div>"#
        );
        assert_eq!(fragment.classes(), vec!["row", "main", "cell"]);
    }
}
