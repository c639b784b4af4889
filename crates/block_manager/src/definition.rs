//! Block definitions.

use canvas_types::{AttrMap, AttrValue};
use serde::{Deserialize, Serialize};

/// Placement rules interpreted by the host.
///
/// The values are opaque here; they are only written onto the fragment root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlacementConstraints {
    /// Selector of the components this one accepts as children
    #[serde(skip_serializing_if = "Option::is_none")]
    pub droppable_into: Option<String>,
    /// Selector of the components this one may be dropped into
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draggable_as: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stylable_properties: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unstylable_properties: Vec<String>,
    /// Properties that must stay available even when `stylable_properties` is set
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stylable_require: Vec<String>,
}

impl PlacementConstraints {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Root element attributes, in a fixed order
    pub fn to_attributes(&self) -> AttrMap {
        let mut attributes = AttrMap::new();
        if let Some(selector) = &self.droppable_into {
            attributes.insert("data-gjs-droppable".into(), AttrValue::String(selector.clone()));
        }
        if let Some(selector) = &self.draggable_as {
            attributes.insert("data-gjs-draggable".into(), AttrValue::String(selector.clone()));
        }
        let lists = [
            ("data-gjs-stylable", &self.stylable_properties),
            ("data-gjs-unstylable", &self.unstylable_properties),
            ("data-gjs-stylable-require", &self.stylable_require),
        ];
        for (key, list) in lists {
            if !list.is_empty() {
                attributes.insert(key.into(), AttrValue::from(list.clone()));
            }
        }
        attributes
    }
}

/// Structured content expanded by the host's component-type system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentContent {
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Stylesheet text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<String>,
    /// Inline style declarations
    #[serde(default, skip_serializing_if = "AttrMap::is_empty")]
    pub style: AttrMap,
    #[serde(default, skip_serializing_if = "AttrMap::is_empty")]
    pub attributes: AttrMap,
}

impl ComponentContent {
    pub fn new(component_type: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            ..Default::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = Some(styles.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), AttrValue::String(value.into()));
        self
    }

    /// Root attributes, including placement constraints written verbatim
    pub fn with_constraints(mut self, constraints: &PlacementConstraints) -> Self {
        for (key, value) in constraints.to_attributes() {
            self.attributes.insert(key, value);
        }
        self
    }
}

/// What inserting the block produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockContent {
    /// Raw markup, optionally with a trailing `<style>` element
    Markup(String),
    Component(ComponentContent),
}

impl BlockContent {
    /// Markup followed by a stylesheet
    pub fn markup_with_style(markup: &str, css: &str) -> Self {
        BlockContent::Markup(format!("{}<style>{}</style>", markup, css))
    }
}

/// A reusable, insertable content fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub category: String,
    /// Icon markup shown in the palette
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    pub content: BlockContent,
    /// Presentational attributes of the palette entry itself
    #[serde(default, skip_serializing_if = "AttrMap::is_empty")]
    pub attributes: AttrMap,
    /// Select the component after it is dropped
    #[serde(default)]
    pub select: bool,
    /// Run the component's activation (e.g. open the asset manager) after drop
    #[serde(default)]
    pub activate: bool,
    /// Wrapper classes the block generates, marked private on registration
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub structural_classes: Vec<String>,
}

impl BlockDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>, content: BlockContent) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category: String::new(),
            media: None,
            content,
            attributes: AttrMap::new(),
            select: false,
            activate: false,
            structural_classes: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_select(mut self, select: bool) -> Self {
        self.select = select;
        self
    }

    pub fn with_activate(mut self, activate: bool) -> Self {
        self.activate = activate;
        self
    }

    pub fn with_structural_classes<S: Into<String>>(mut self, classes: impl IntoIterator<Item = S>) -> Self {
        self.structural_classes.extend(classes.into_iter().map(Into::into));
        self
    }

    /// Selector names (`.gjs-row`) of the structural classes
    pub fn private_selectors(&self) -> Vec<String> {
        self.structural_classes
            .iter()
            .map(|class| format!(".{}", class.trim_start_matches('.')))
            .collect()
    }
}
