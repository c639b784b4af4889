//! Component-type binding rules.
//!
//! Descendants are addressed through named [`Slot`] handles rather than bare
//! child indices. A slot still resolves by position, so fragment markup must keep
//! its structure stable, but a slot can also pin the tag it expects and refuse
//! to write into the wrong element when the markup changes.

use canvas_types::{to_dom_string, AttrMap, AttrValue, Element};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ui_trait_controls::TraitSeed;

/// Predicate deciding whether an element is an instance of a component type
pub type Matcher = Arc<dyn Fn(&Element) -> bool + Send + Sync>;

/// Match elements by tag name, ignoring case
pub fn tag_matcher(tag: impl Into<String>) -> Matcher {
    let tag = tag.into();
    Arc::new(move |element: &Element| element.tag_is(&tag))
}

/// Named handle to a direct child of the component root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub index: usize,
    /// Tag the child must have for the slot to resolve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Slot {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
            tag: None,
        }
    }

    pub fn expecting(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn resolve<'a>(&self, root: &'a Element) -> Option<&'a Element> {
        root.child(self.index).filter(|child| self.accepts(child))
    }

    pub fn resolve_mut<'a>(&self, root: &'a mut Element) -> Option<&'a mut Element> {
        root.child_mut(self.index).filter(|child| self.accepts(child))
    }

    fn accepts(&self, child: &Element) -> bool {
        self.tag.as_deref().map_or(true, |tag| child.tag_is(tag))
    }
}

/// Attribute-to-descendant synchronization
#[derive(Debug, Clone, PartialEq)]
pub enum SyncRule {
    /// Copy allow-listed attributes onto the slot element's attributes
    Attributes { slot: Slot, allow: Vec<String> },
    /// Write one attribute as the slot element's text content
    TextContent { attribute: String, slot: Slot },
}

impl SyncRule {
    pub fn attributes<S: Into<String>>(slot: Slot, allow: impl IntoIterator<Item = S>) -> Self {
        SyncRule::Attributes {
            slot,
            allow: allow.into_iter().map(Into::into).collect(),
        }
    }

    pub fn text_content(attribute: impl Into<String>, slot: Slot) -> Self {
        SyncRule::TextContent {
            attribute: attribute.into(),
            slot,
        }
    }

    pub fn slot(&self) -> &Slot {
        match self {
            SyncRule::Attributes { slot, .. } | SyncRule::TextContent { slot, .. } => slot,
        }
    }

    /// Attribute this rule listens to, `None` for every attribute
    pub fn watched_key(&self) -> Option<&str> {
        match self {
            SyncRule::Attributes { .. } => None,
            SyncRule::TextContent { attribute, .. } => Some(attribute),
        }
    }

    pub fn applies_to(&self, key: &str) -> bool {
        match self {
            SyncRule::Attributes { allow, .. } => allow.iter().any(|allowed| allowed == key),
            SyncRule::TextContent { attribute, .. } => attribute == key,
        }
    }

    /// Apply one attribute change to the rendered element.
    ///
    /// Returns `false` when the rule does not apply to `key` or its slot does not
    /// resolve against `root`.
    pub fn apply(&self, root: &mut Element, key: &str, value: &AttrValue) -> bool {
        if !self.applies_to(key) {
            return false;
        }
        let Some(target) = self.slot().resolve_mut(root) else {
            return false;
        };

        match self {
            SyncRule::Attributes { .. } => {
                if value.is_null() {
                    target.attributes.remove(key);
                } else {
                    target.set_attribute(key, to_dom_string(value));
                }
            }
            SyncRule::TextContent { .. } => {
                if value.is_null() {
                    target.text = None;
                } else {
                    target.set_text(to_dom_string(value));
                }
            }
        }
        true
    }
}

/// Everything a component of this type starts with
#[derive(Debug, Clone, Default)]
pub struct ComponentTypeSpec {
    pub default_traits: Vec<TraitSeed>,
    pub default_attributes: AttrMap,
    pub sync_rules: Vec<SyncRule>,
    /// Markup used when the component is created from scratch rather than
    /// recognized in an existing element
    pub template: Option<Element>,
}

impl ComponentTypeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_traits<T: Into<TraitSeed>>(mut self, traits: impl IntoIterator<Item = T>) -> Self {
        self.default_traits.extend(traits.into_iter().map(Into::into));
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: AttrValue) -> Self {
        self.default_attributes.insert(key.into(), value);
        self
    }

    pub fn with_rule(mut self, rule: SyncRule) -> Self {
        self.sync_rules.push(rule);
        self
    }

    pub fn with_template(mut self, template: Element) -> Self {
        self.template = Some(template);
        self
    }
}
